//! Pure functions for mapping service errors to HTTP status codes.

use crate::storage::repository_error_to_status_code;

use super::ServiceError;

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `Conflict` -> 409
/// - `Validation` -> 400
/// - `Store` -> the repository mapping (503 for connection failures, else 500)
/// - `Internal`, `PartialWrite` -> 500
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::NotFound { .. } => 404,
        ServiceError::Conflict { .. } => 409,
        ServiceError::Validation(_) => 400,
        ServiceError::Store(inner) => repository_error_to_status_code(inner),
        ServiceError::Internal(_) => 500,
        ServiceError::PartialWrite { .. } => 500,
    }
}
