//! Daily task model and DTOs. Daily tasks are scoped to a user, not a project.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use workdesk_core::types::{DbId, Timestamp};

/// A row from the `daily_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyTask {
    pub id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub position: i32,
    pub due_date: Option<Timestamp>,
    pub start_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DailyTask {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// DTO for creating a daily task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDailyTask {
    pub user_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub user_name: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<Timestamp>,
    pub start_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for updating a daily task. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDailyTask {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<Timestamp>,
    pub start_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
}

/// Filters and paging for daily task search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyTaskFilter {
    pub user_id: Option<DbId>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}
