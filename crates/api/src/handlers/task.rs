//! Handlers for the `/tasks` resource (project board cards).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use workdesk_core::types::DbId;
use workdesk_db::models::task::{
    AssignTask, BulkAssignTasks, BulkMoveTasks, BulkSetTaskStatus, CreateProjectTask, MoveTask,
    SetParentTask, SetTaskStatus, TaskFilter, UpdateProjectTask,
};
use workdesk_db::repositories::ProjectTaskRepo;

use crate::error::{AppError, AppResult};
use crate::response::{AffectedCount, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/tasks
pub async fn search(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> AppResult<impl IntoResponse> {
    let page = ProjectTaskRepo::search(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectTask>,
) -> AppResult<impl IntoResponse> {
    let task = ProjectTaskRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = ProjectTaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("ProjectTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectTask>,
) -> AppResult<impl IntoResponse> {
    let task = ProjectTaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("ProjectTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ProjectTaskRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("ProjectTask", id))
    }
}

// ---------------------------------------------------------------------------
// Single-task operations
// ---------------------------------------------------------------------------

/// PUT /api/v1/tasks/{id}/move
pub async fn move_task(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MoveTask>,
) -> AppResult<impl IntoResponse> {
    let task = ProjectTaskRepo::move_task(&state.pool, id, input.column_id, input.position)
        .await?
        .ok_or(AppError::not_found("ProjectTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}/assign
///
/// A body with `assignee_id: null` clears the assignee.
pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignTask>,
) -> AppResult<impl IntoResponse> {
    let task = ProjectTaskRepo::assign(
        &state.pool,
        id,
        input.assignee_id,
        input.assignee_name.as_deref(),
    )
    .await?
    .ok_or(AppError::not_found("ProjectTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetTaskStatus>,
) -> AppResult<impl IntoResponse> {
    let task = ProjectTaskRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or(AppError::not_found("ProjectTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}/parent
pub async fn set_parent(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetParentTask>,
) -> AppResult<impl IntoResponse> {
    let task = ProjectTaskRepo::convert_to_sub_task(&state.pool, id, input.parent_task_id)
        .await?
        .ok_or(AppError::not_found("ProjectTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}/parent
pub async fn clear_parent(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = ProjectTaskRepo::convert_to_standalone(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("ProjectTask", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// GET /api/v1/tasks/{id}/subtasks
pub async fn list_sub_tasks(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tasks = ProjectTaskRepo::list_sub_tasks(&state.pool, id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

/// POST /api/v1/tasks/bulk/move
pub async fn bulk_move(
    State(state): State<AppState>,
    Json(input): Json<BulkMoveTasks>,
) -> AppResult<impl IntoResponse> {
    let affected =
        ProjectTaskRepo::bulk_move(&state.pool, &input.task_ids, input.column_id, input.position)
            .await?;
    Ok(Json(DataResponse {
        data: AffectedCount { affected },
    }))
}

/// POST /api/v1/tasks/bulk/assign
pub async fn bulk_assign(
    State(state): State<AppState>,
    Json(input): Json<BulkAssignTasks>,
) -> AppResult<impl IntoResponse> {
    let affected = ProjectTaskRepo::bulk_assign(
        &state.pool,
        &input.task_ids,
        input.assignee_id,
        input.assignee_name.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse {
        data: AffectedCount { affected },
    }))
}

/// POST /api/v1/tasks/bulk/status
pub async fn bulk_status(
    State(state): State<AppState>,
    Json(input): Json<BulkSetTaskStatus>,
) -> AppResult<impl IntoResponse> {
    let affected =
        ProjectTaskRepo::bulk_set_status(&state.pool, &input.task_ids, &input.status).await?;
    Ok(Json(DataResponse {
        data: AffectedCount { affected },
    }))
}
