//! Handlers for board columns.
//!
//! Columns are listed and created under `/projects/{project_id}/columns`
//! and addressed directly as `/columns/{id}` afterwards.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use workdesk_core::types::DbId;
use workdesk_db::models::column::{BulkDeleteColumns, ColumnPosition, CreateColumn, UpdateColumn};
use workdesk_db::models::task::ReorderTasks;
use workdesk_db::repositories::{ProjectColumnRepo, ProjectRepo, ProjectTaskRepo};

use crate::error::{AppError, AppResult};
use crate::query::ColumnDeleteParams;
use crate::response::{AffectedCount, DataResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CanDeleteResponse {
    pub can_delete: bool,
}

/// GET /api/v1/projects/{project_id}/columns
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::not_found("Project", project_id))?;
    let columns = ProjectColumnRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: columns }))
}

/// POST /api/v1/projects/{project_id}/columns
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<CreateColumn>,
) -> AppResult<impl IntoResponse> {
    input.project_id = project_id;
    let column = ProjectColumnRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: column })))
}

/// PUT /api/v1/projects/{project_id}/columns/reorder
pub async fn reorder(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(positions): Json<Vec<ColumnPosition>>,
) -> AppResult<impl IntoResponse> {
    ProjectColumnRepo::reorder(&state.pool, project_id, &positions).await?;
    let columns = ProjectColumnRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: columns }))
}

/// POST /api/v1/projects/{project_id}/columns/bulk-delete
pub async fn bulk_delete(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<BulkDeleteColumns>,
) -> AppResult<impl IntoResponse> {
    let affected = ProjectColumnRepo::delete_many(
        &state.pool,
        project_id,
        &input.column_ids,
        input.move_tasks_to_column_id,
    )
    .await?;
    Ok(Json(DataResponse {
        data: AffectedCount { affected },
    }))
}

/// PUT /api/v1/columns/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateColumn>,
) -> AppResult<impl IntoResponse> {
    let column = ProjectColumnRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("ProjectColumn", id))?;
    Ok(Json(DataResponse { data: column }))
}

/// DELETE /api/v1/columns/{id}?move_tasks_to={column_id}
///
/// Without `move_tasks_to` the column's live tasks are soft-deleted.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ColumnDeleteParams>,
) -> AppResult<StatusCode> {
    if ProjectColumnRepo::delete(&state.pool, id, params.move_tasks_to).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("ProjectColumn", id))
    }
}

/// GET /api/v1/columns/{id}/can-delete
pub async fn can_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let can_delete = ProjectColumnRepo::can_delete(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CanDeleteResponse { can_delete },
    }))
}

/// GET /api/v1/columns/{id}/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tasks = ProjectTaskRepo::list_by_column(&state.pool, id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// PUT /api/v1/columns/{id}/tasks/reorder
pub async fn reorder_tasks(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReorderTasks>,
) -> AppResult<impl IntoResponse> {
    let tasks = ProjectTaskRepo::reorder_in_column(&state.pool, id, &input.task_ids).await?;
    Ok(Json(DataResponse { data: tasks }))
}
