//! Board column model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use workdesk_core::types::{DbId, Timestamp};

/// A row from the `project_columns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectColumn {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub color: String,
    pub position: i32,
    pub is_default: bool,
    pub task_limit: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A column annotated with the number of live tasks it holds.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ColumnWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub column: ProjectColumn,
    pub task_count: i64,
}

/// DTO for creating a column. `project_id` is taken from the URL path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateColumn {
    #[serde(default)]
    pub project_id: DbId,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub color: Option<String>,
    /// Appended after the last column when omitted or not positive.
    pub position: Option<i32>,
    pub is_default: Option<bool>,
    pub task_limit: Option<i32>,
}

/// DTO for updating a column. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateColumn {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    pub color: Option<String>,
    pub position: Option<i32>,
    pub is_default: Option<bool>,
    pub task_limit: Option<i32>,
}

/// One entry of a column reorder request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ColumnPosition {
    pub column_id: DbId,
    pub position: i32,
}

/// Payload for bulk column deletion.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteColumns {
    pub column_ids: Vec<DbId>,
    pub move_tasks_to_column_id: Option<DbId>,
}
