//! Store-level error type.
//!
//! Repositories that enforce business rules return [`StoreResult`]; plain
//! CRUD methods return `sqlx::Error` directly and convert via `?`.

use validator::Validate;
use workdesk_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain rule was violated or an entity was missing.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The database rejected or failed the statement.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::invalid(msg))
    }

    pub fn not_found(entity: &'static str, id: workdesk_core::types::DbId) -> Self {
        Self::Core(CoreError::NotFound { entity, id })
    }
}

/// Run `validator` derives on a request DTO, mapping failures to
/// [`CoreError::Validation`].
pub(crate) fn validate_input<T: Validate>(input: &T) -> StoreResult<()> {
    input
        .validate()
        .map_err(|e| StoreError::Core(CoreError::Validation(e.to_string())))
}
