use thiserror::Error;

/// Errors raised when a draft or replacement record is malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required")]
    MissingEmail,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Password is required")]
    MissingPassword,
    #[error("Project title cannot be empty")]
    EmptyTitle,
    #[error("Project owner is required")]
    MissingOwner,
    #[error("Project owner cannot be changed")]
    OwnerChanged,
}
