//! Handlers for user-scoped daily tasks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use workdesk_core::types::DbId;
use workdesk_db::models::daily_task::{CreateDailyTask, DailyTaskFilter, UpdateDailyTask};
use workdesk_db::models::task::{ReorderTasks, SetTaskStatus};
use workdesk_db::repositories::DailyTaskRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/daily-tasks
pub async fn search(
    State(state): State<AppState>,
    Query(filter): Query<DailyTaskFilter>,
) -> AppResult<impl IntoResponse> {
    let page = DailyTaskRepo::search(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/daily-tasks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateDailyTask>,
) -> AppResult<impl IntoResponse> {
    let task = DailyTaskRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/daily-tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = DailyTaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("DailyTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/daily-tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDailyTask>,
) -> AppResult<impl IntoResponse> {
    let task = DailyTaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("DailyTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/daily-tasks/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if DailyTaskRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("DailyTask", id))
    }
}

/// PUT /api/v1/daily-tasks/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetTaskStatus>,
) -> AppResult<impl IntoResponse> {
    let task = DailyTaskRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::not_found("DailyTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/users/{user_id}/daily-tasks/reorder
pub async fn reorder(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<ReorderTasks>,
) -> AppResult<impl IntoResponse> {
    let tasks = DailyTaskRepo::reorder(&state.pool, user_id, &input.task_ids).await?;
    Ok(Json(DataResponse { data: tasks }))
}
