//! Shared query parameter types for API handlers.

use serde::Deserialize;
use workdesk_core::types::DbId;

/// `?move_tasks_to=` on column deletion.
#[derive(Debug, Default, Deserialize)]
pub struct ColumnDeleteParams {
    pub move_tasks_to: Option<DbId>,
}
