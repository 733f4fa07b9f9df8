//! Route definitions for the `/projects` resource.
//!
//! Also nests project-scoped column routes under `/projects/{id}/columns`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{column, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> search
/// POST   /                                  -> create
/// POST   /bulk/status                       -> bulk_status
/// POST   /bulk/archive                      -> bulk_archive
/// GET    /{id}                              -> get_board
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// POST   /{id}/restore                      -> restore
/// GET    /{id}/stats                        -> stats
/// GET    /{id}/team                         -> team
/// POST   /{id}/team/{user_id}               -> add_team_member
/// DELETE /{id}/team/{user_id}               -> remove_team_member
///
/// GET    /{id}/columns              -> list_by_project
/// POST   /{id}/columns              -> create
/// PUT    /{id}/columns/reorder      -> reorder
/// POST   /{id}/columns/bulk-delete  -> bulk_delete
/// ```
pub fn router() -> Router<AppState> {
    let column_routes = Router::new()
        .route("/", get(column::list_by_project).post(column::create))
        .route("/reorder", put(column::reorder))
        .route("/bulk-delete", post(column::bulk_delete));

    Router::new()
        .route("/", get(project::search).post(project::create))
        .route("/bulk/status", post(project::bulk_status))
        .route("/bulk/archive", post(project::bulk_archive))
        .route(
            "/{id}",
            get(project::get_board)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/restore", post(project::restore))
        .route("/{id}/stats", get(project::stats))
        .route("/{id}/team", get(project::team))
        .route(
            "/{id}/team/{user_id}",
            post(project::add_team_member).delete(project::remove_team_member),
        )
        .nest("/{id}/columns", column_routes)
}
