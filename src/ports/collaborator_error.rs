//! Error shared by the ports that fulfil a completed checkout.

use thiserror::Error;

/// Failure reported by an `ActivationService` or `OrderStore`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// Collaborator could not be reached or timed out.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// Collaborator answered but refused the request.
    #[error("collaborator rejected request: {0}")]
    Rejected(String),

    /// Persistence layer error.
    #[error("database error: {0}")]
    Database(String),
}

impl CollaboratorError {
    /// Check if retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CollaboratorError::Unavailable(_) | CollaboratorError::Database(_)
        )
    }
}
