use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, malformed, expired or orphaned token. Never says which.
    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
