use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested ticket state change is not part of the lifecycle.
    #[error("Cannot transition ticket from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// Every candidate slot is occupied or was claimed by a concurrent request.
    #[error("No slot available among {candidates} candidate(s)")]
    NoSlotAvailable { candidates: usize },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::NoSlotAvailable { .. })
    }
}
