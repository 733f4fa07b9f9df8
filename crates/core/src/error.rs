use crate::types::DbId;

/// Domain-level failures shared by the store and HTTP layers.
///
/// `NotFound` and `InvalidOperation` are caller errors; `Internal` is a
/// server-side failure that should be logged and surfaced as a 5xx.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for building an [`CoreError::InvalidOperation`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}
