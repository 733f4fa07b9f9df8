//! Route definitions for task comments.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::comment;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /?project_task_id=|daily_task_id=   -> list_for_task
/// POST   /                                   -> create
/// PUT    /{id}                               -> update
/// DELETE /{id}                               -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comment::list_for_task).post(comment::create))
        .route("/{id}", put(comment::update).delete(comment::delete))
}
