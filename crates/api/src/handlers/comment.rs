//! Handlers for task comments.
//!
//! Listing takes `?project_task_id=` or `?daily_task_id=`, exactly one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use workdesk_core::task_ref::TaskRef;
use workdesk_core::types::DbId;
use workdesk_db::models::comment::{CreateTaskComment, TaskRefQuery, UpdateTaskComment};
use workdesk_db::repositories::TaskCommentRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/comments?project_task_id=|daily_task_id=
pub async fn list_for_task(
    State(state): State<AppState>,
    Query(query): Query<TaskRefQuery>,
) -> AppResult<impl IntoResponse> {
    let task = TaskRef::from_ids(query.project_task_id, query.daily_task_id)?;
    let comments = TaskCommentRepo::list_for_task(&state.pool, task).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/comments
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTaskComment>,
) -> AppResult<impl IntoResponse> {
    let comment = TaskCommentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// PUT /api/v1/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTaskComment>,
) -> AppResult<impl IntoResponse> {
    let comment = TaskCommentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("TaskComment", id))?;
    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if TaskCommentRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("TaskComment", id))
    }
}
