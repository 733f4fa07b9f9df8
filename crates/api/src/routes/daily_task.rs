//! Route definitions for daily tasks.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::daily_task;
use crate::state::AppState;

/// Routes mounted at `/daily-tasks`.
///
/// ```text
/// GET    /              -> search
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// PUT    /{id}/status   -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(daily_task::search).post(daily_task::create))
        .route(
            "/{id}",
            get(daily_task::get_by_id)
                .put(daily_task::update)
                .delete(daily_task::delete),
        )
        .route("/{id}/status", put(daily_task::set_status))
}

/// Routes mounted at `/users`.
///
/// ```text
/// PUT    /{user_id}/daily-tasks/reorder   -> reorder
/// ```
pub fn user_router() -> Router<AppState> {
    Router::new().route("/{user_id}/daily-tasks/reorder", put(daily_task::reorder))
}
