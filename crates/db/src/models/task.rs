//! Project task (board card) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use workdesk_core::types::{DbId, Timestamp};

/// A row from the `project_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectTask {
    pub id: DbId,
    pub project_id: DbId,
    pub column_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub contact_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub assignee_name: Option<String>,
    pub status: String,
    pub priority: String,
    pub position: i32,
    pub parent_task_id: Option<DbId>,
    pub due_date: Option<Timestamp>,
    pub start_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    #[sqlx(json)]
    pub tags: Vec<String>,
    /// Legacy URL list; new uploads go through task attachments.
    #[sqlx(json)]
    pub attachment_urls: Vec<String>,
    pub created_by: Option<DbId>,
    pub updated_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectTask {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// DTO for creating a project task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectTask {
    pub project_id: DbId,
    pub column_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub contact_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub assignee_name: Option<String>,
    /// Defaults to `todo` if omitted.
    pub status: Option<String>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    pub parent_task_id: Option<DbId>,
    pub due_date: Option<Timestamp>,
    pub start_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by: Option<DbId>,
}

/// DTO for updating a project task. All fields are optional.
///
/// Column, position, assignee, and parent changes go through their
/// dedicated operations.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProjectTask {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub contact_id: Option<DbId>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<Timestamp>,
    pub start_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub attachment_urls: Option<Vec<String>>,
    pub updated_by: Option<DbId>,
}

/// Filters and paging for task search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Case-insensitive substring match on title or description.
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub contact_id: Option<DbId>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

/// Payload for moving a task to another column.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MoveTask {
    pub column_id: DbId,
    pub position: i32,
}

/// Payload for moving several tasks at once.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkMoveTasks {
    pub task_ids: Vec<DbId>,
    pub column_id: DbId,
    pub position: i32,
}

/// Payload for setting or clearing an assignee.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignTask {
    pub assignee_id: Option<DbId>,
    pub assignee_name: Option<String>,
}

/// Payload for assigning several tasks at once.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkAssignTasks {
    pub task_ids: Vec<DbId>,
    pub assignee_id: Option<DbId>,
    pub assignee_name: Option<String>,
}

/// Payload for a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct SetTaskStatus {
    pub status: String,
}

/// Payload for changing several task statuses at once.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkSetTaskStatus {
    pub task_ids: Vec<DbId>,
    pub status: String,
}

/// Payload for making a task a sub-task.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SetParentTask {
    pub parent_task_id: DbId,
}

/// Payload for reordering tasks within a column or user scope.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderTasks {
    pub task_ids: Vec<DbId>,
}
