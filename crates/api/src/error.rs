//! HTTP error mapping.
//!
//! Every handler returns [`AppResult`]. Domain and store failures are
//! converted into a JSON body of the form `{"error": "...", "code": "..."}`.
//! Server-side failures are logged and reported with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use workdesk_core::error::CoreError;
use workdesk_core::types::DbId;
use workdesk_db::StoreError;

/// PostgreSQL `check_violation`.
const CHECK_VIOLATION: &str = "23514";

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Board rule violations and missing entities.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request that never reached a repository.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::Core(CoreError::NotFound { entity, id })
    }

    /// Status, machine-readable code, and client-facing message.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::InvalidOperation(msg)) => {
                (StatusCode::BAD_REQUEST, "INVALID_OPERATION", msg.clone())
            }
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Core(CoreError::Internal(msg)) | AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Request failed with an internal error");
                internal()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(core) => Self::Core(core),
            StoreError::Database(db) => Self::Database(db),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.classify();
        (status, Json(ErrorBody { error, code })).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// `RowNotFound` is a 404 and a violated CHECK constraint is a 400. Anything
/// else is logged and reported as a 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(CHECK_VIOLATION) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!(
                "Value violates check constraint: {}",
                db_err.constraint().unwrap_or("unknown")
            ),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
