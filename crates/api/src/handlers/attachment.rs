//! Handlers for task attachments.
//!
//! Files are uploaded out of band; these endpoints record and manage the
//! metadata that points at them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use workdesk_core::task_ref::TaskRef;
use workdesk_core::types::DbId;
use workdesk_db::models::attachment::{
    AttachmentStatsQuery, CreateTaskAttachment, UpdateTaskAttachment,
};
use workdesk_db::models::comment::TaskRefQuery;
use workdesk_db::repositories::TaskAttachmentRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub removed: u64,
}

/// GET /api/v1/attachments?project_task_id=|daily_task_id=
pub async fn list_for_task(
    State(state): State<AppState>,
    Query(query): Query<TaskRefQuery>,
) -> AppResult<impl IntoResponse> {
    let task = TaskRef::from_ids(query.project_task_id, query.daily_task_id)?;
    let attachments = TaskAttachmentRepo::list_for_task(&state.pool, task).await?;
    Ok(Json(DataResponse { data: attachments }))
}

/// POST /api/v1/attachments
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTaskAttachment>,
) -> AppResult<impl IntoResponse> {
    let attachment = TaskAttachmentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: attachment })))
}

/// PUT /api/v1/attachments/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTaskAttachment>,
) -> AppResult<impl IntoResponse> {
    let attachment = TaskAttachmentRepo::update_caption(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("TaskAttachment", id))?;
    Ok(Json(DataResponse { data: attachment }))
}

/// DELETE /api/v1/attachments/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if TaskAttachmentRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("TaskAttachment", id))
    }
}

/// GET /api/v1/attachments/stats?project_task_id=|daily_task_id=|uploaded_by=
///
/// Exactly one selector must be given.
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<AttachmentStatsQuery>,
) -> AppResult<impl IntoResponse> {
    let stats = match (query.project_task_id, query.daily_task_id, query.uploaded_by) {
        (Some(id), None, None) => {
            TaskAttachmentRepo::stats_for_project_task(&state.pool, id).await?
        }
        (None, Some(id), None) => TaskAttachmentRepo::stats_for_daily_task(&state.pool, id).await?,
        (None, None, Some(id)) => TaskAttachmentRepo::stats_for_uploader(&state.pool, id).await?,
        _ => {
            return Err(AppError::BadRequest(
                "Exactly one of project_task_id, daily_task_id or uploaded_by is required"
                    .to_string(),
            ))
        }
    };
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/attachments/cleanup
pub async fn cleanup(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let removed = TaskAttachmentRepo::cleanup_orphaned(&state.pool).await?;
    Ok(Json(DataResponse {
        data: CleanupResponse { removed },
    }))
}
