//! Route definitions for columns addressed by id.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::column;
use crate::state::AppState;

/// Routes mounted at `/columns`.
///
/// ```text
/// PUT    /{id}                   -> update
/// DELETE /{id}?move_tasks_to=    -> delete
/// GET    /{id}/can-delete        -> can_delete
/// GET    /{id}/tasks             -> list_tasks
/// PUT    /{id}/tasks/reorder     -> reorder_tasks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(column::update).delete(column::delete))
        .route("/{id}/can-delete", get(column::can_delete))
        .route("/{id}/tasks", get(column::list_tasks))
        .route("/{id}/tasks/reorder", put(column::reorder_tasks))
}
