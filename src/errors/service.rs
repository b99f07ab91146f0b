use thiserror::Error;

use super::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Short name already allocated in the tenant scope
    #[error("Conflict error: {0}")]
    Conflict(String),

    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
