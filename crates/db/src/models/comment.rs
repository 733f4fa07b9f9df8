//! Task comment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use workdesk_core::types::{DbId, Timestamp};

/// A row from the `task_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskComment {
    pub id: DbId,
    pub project_task_id: Option<DbId>,
    pub daily_task_id: Option<DbId>,
    pub content: String,
    pub author_id: DbId,
    pub author_name: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a comment. Exactly one task id must be set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskComment {
    pub project_task_id: Option<DbId>,
    pub daily_task_id: Option<DbId>,
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    pub author_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub author_name: String,
}

/// DTO for editing a comment. Only the content may change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTaskComment {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}

/// Query selecting the task whose comments or attachments are listed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskRefQuery {
    pub project_task_id: Option<DbId>,
    pub daily_task_id: Option<DbId>,
}
