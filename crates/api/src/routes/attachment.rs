//! Route definitions for task attachments.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::attachment;
use crate::state::AppState;

/// Routes mounted at `/attachments`.
///
/// ```text
/// GET    /?project_task_id=|daily_task_id=   -> list_for_task
/// POST   /                                   -> create
/// GET    /stats                              -> stats
/// POST   /cleanup                            -> cleanup
/// PUT    /{id}                               -> update
/// DELETE /{id}                               -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(attachment::list_for_task).post(attachment::create))
        .route("/stats", get(attachment::stats))
        .route("/cleanup", post(attachment::cleanup))
        .route("/{id}", put(attachment::update).delete(attachment::delete))
}
