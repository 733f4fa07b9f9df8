//! Route definitions for the `/tasks` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                  -> search
/// POST   /                  -> create
/// POST   /bulk/move         -> bulk_move
/// POST   /bulk/assign       -> bulk_assign
/// POST   /bulk/status       -> bulk_status
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// PUT    /{id}/move         -> move_task
/// PUT    /{id}/assign       -> assign
/// PUT    /{id}/status       -> set_status
/// PUT    /{id}/parent       -> set_parent
/// DELETE /{id}/parent       -> clear_parent
/// GET    /{id}/subtasks     -> list_sub_tasks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task::search).post(task::create))
        .route("/bulk/move", post(task::bulk_move))
        .route("/bulk/assign", post(task::bulk_assign))
        .route("/bulk/status", post(task::bulk_status))
        .route(
            "/{id}",
            get(task::get_by_id).put(task::update).delete(task::delete),
        )
        .route("/{id}/move", put(task::move_task))
        .route("/{id}/assign", put(task::assign))
        .route("/{id}/status", put(task::set_status))
        .route(
            "/{id}/parent",
            put(task::set_parent).delete(task::clear_parent),
        )
        .route("/{id}/subtasks", get(task::list_sub_tasks))
}
