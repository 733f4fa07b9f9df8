pub mod attachment;
pub mod column;
pub mod comment;
pub mod daily_task;
pub mod health;
pub mod project;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                        search, create
/// /projects/{id}                                   board view, update, delete
/// /projects/{id}/restore                           restore (POST)
/// /projects/{id}/stats                             task statistics
/// /projects/{id}/team                              roster
/// /projects/{id}/team/{user_id}                    add (POST), remove (DELETE)
/// /projects/bulk/status                            bulk status (POST)
/// /projects/bulk/archive                           bulk archive (POST)
/// /projects/{id}/columns                           list, create
/// /projects/{id}/columns/reorder                   reorder (PUT)
/// /projects/{id}/columns/bulk-delete               bulk delete (POST)
///
/// /columns/{id}                                    update, delete (?move_tasks_to=)
/// /columns/{id}/can-delete                         deletion check
/// /columns/{id}/tasks                              tasks in board order
/// /columns/{id}/tasks/reorder                      reorder (PUT)
///
/// /tasks                                           search, create
/// /tasks/{id}                                      get, update, delete
/// /tasks/{id}/move | /assign | /status             single-task changes (PUT)
/// /tasks/{id}/parent                               set (PUT), clear (DELETE)
/// /tasks/{id}/subtasks                             direct children
/// /tasks/bulk/move | /bulk/assign | /bulk/status   bulk changes (POST)
///
/// /daily-tasks                                     search, create
/// /daily-tasks/{id}                                get, update, delete
/// /daily-tasks/{id}/status                         status (PUT)
/// /users/{user_id}/daily-tasks/reorder             reorder (PUT)
///
/// /comments                                        list (?task), create
/// /comments/{id}                                   update, delete
///
/// /attachments                                     list (?task), create
/// /attachments/{id}                                update caption, delete
/// /attachments/stats                               count and bytes
/// /attachments/cleanup                             orphan cleanup (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Projects, with their columns nested.
        .nest("/projects", project::router())
        // Columns addressed by id.
        .nest("/columns", column::router())
        // Board tasks.
        .nest("/tasks", task::router())
        // Per-user daily tasks.
        .nest("/daily-tasks", daily_task::router())
        .nest("/users", daily_task::user_router())
        // Comments and attachments on either kind of task.
        .nest("/comments", comment::router())
        .nest("/attachments", attachment::router())
}
