//! Handlers for the `/projects` resource.
//!
//! `GET /projects/{id}` returns the board view: the project, its ordered
//! columns with live task counts, and task statistics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use workdesk_core::types::DbId;
use workdesk_db::models::project::{
    BulkProjectArchive, BulkProjectStatus, CreateProject, ProjectFilter, UpdateProject,
};
use workdesk_db::repositories::{ProjectRepo, ProjectTaskRepo};

use crate::error::{AppError, AppResult};
use crate::response::{AffectedCount, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
pub async fn search(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<impl IntoResponse> {
    let page = ProjectRepo::search(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/projects
///
/// Creates the project together with its default columns.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let board = ProjectRepo::find_with_board(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: board }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ProjectRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Project", id))
    }
}

/// POST /api/v1/projects/{id}/restore
pub async fn restore(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ProjectRepo::restore(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Project", id))
    }
}

/// GET /api/v1/projects/{id}/stats
pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let stats = ProjectTaskRepo::project_stats(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: stats }))
}

// ---------------------------------------------------------------------------
// Team roster
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/team
pub async fn team(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let team = ProjectRepo::team_members(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: team }))
}

/// POST /api/v1/projects/{id}/team/{user_id}
pub async fn add_team_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let team = ProjectRepo::add_team_member(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: team }))
}

/// DELETE /api/v1/projects/{id}/team/{user_id}
pub async fn remove_team_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let team = ProjectRepo::remove_team_member(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: team }))
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/bulk/status
pub async fn bulk_status(
    State(state): State<AppState>,
    Json(input): Json<BulkProjectStatus>,
) -> AppResult<impl IntoResponse> {
    let affected =
        ProjectRepo::bulk_update_status(&state.pool, &input.project_ids, &input.status).await?;
    Ok(Json(DataResponse {
        data: AffectedCount { affected },
    }))
}

/// POST /api/v1/projects/bulk/archive
pub async fn bulk_archive(
    State(state): State<AppState>,
    Json(input): Json<BulkProjectArchive>,
) -> AppResult<impl IntoResponse> {
    let affected =
        ProjectRepo::bulk_set_archived(&state.pool, &input.project_ids, input.is_archived).await?;
    Ok(Json(DataResponse {
        data: AffectedCount { affected },
    }))
}
