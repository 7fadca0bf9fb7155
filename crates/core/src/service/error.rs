use thiserror::Error;

use crate::portfolio::ValidationError;
use crate::storage::RepositoryError;

/// Errors returned by the consistency service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    #[error("a user with email {email} already exists")]
    Conflict { email: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),

    /// A multi-step write stopped partway. Steps before `completed` are
    /// persisted and stay persisted; the operation can be retried.
    #[error("{operation} stopped after {completed} of {total} steps: {source}")]
    PartialWrite {
        operation: &'static str,
        completed: usize,
        total: usize,
        source: RepositoryError,
    },
}

impl ServiceError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for store faults, hashing faults and partial writes.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Internal(_) | Self::PartialWrite { .. }
        )
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Store(other),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
