//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use workdesk_core::types::{DbId, Timestamp};

use crate::models::column::ColumnWithCount;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub owner_name: String,
    pub contact_id: Option<DbId>,
    #[sqlx(json)]
    pub team_members: Vec<DbId>,
    pub budget: Option<f64>,
    pub currency: Option<String>,
    pub status: String,
    pub project_type: String,
    pub priority: String,
    pub progress: i32,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub is_archived: bool,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub owner_name: String,
    pub contact_id: Option<DbId>,
    #[serde(default)]
    pub team_members: Vec<DbId>,
    pub budget: Option<f64>,
    pub currency: Option<String>,
    /// Defaults to `active` if omitted.
    pub status: Option<String>,
    /// Defaults to `internal` if omitted.
    pub project_type: Option<String>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    /// Clamped to `0..=100`. Defaults to 0.
    pub progress: Option<i32>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: Option<DbId>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub contact_id: Option<DbId>,
    pub team_members: Option<Vec<DbId>>,
    pub budget: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub project_type: Option<String>,
    pub priority: Option<String>,
    pub progress: Option<i32>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub tags: Option<Vec<String>>,
    pub is_archived: Option<bool>,
    pub updated_by: Option<DbId>,
}

/// Filters, sorting, and paging for project search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,
    pub status: Option<String>,
    pub project_type: Option<String>,
    pub priority: Option<String>,
    pub owner_id: Option<DbId>,
    pub contact_id: Option<DbId>,
    pub team_member_id: Option<DbId>,
    pub is_archived: Option<bool>,
    /// Keep projects whose start/end window reaches this instant or later.
    pub date_from: Option<Timestamp>,
    /// Keep projects whose start/end window begins at this instant or earlier.
    pub date_to: Option<Timestamp>,
    pub sort_by: Option<String>,
    pub sort_desc: Option<bool>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

/// Task statistics computed on read for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub overdue_tasks: i64,
    pub team_members: i64,
    pub completion_percentage: f64,
}

/// A project with its ordered columns and statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectBoard {
    pub project: Project,
    pub columns: Vec<ColumnWithCount>,
    pub stats: ProjectStats,
}

/// Payload for bulk status updates.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkProjectStatus {
    pub project_ids: Vec<DbId>,
    pub status: String,
}

/// Payload for bulk archive toggles.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkProjectArchive {
    pub project_ids: Vec<DbId>,
    pub is_archived: bool,
}
