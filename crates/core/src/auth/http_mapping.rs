use crate::service::service_error_to_status_code;

use super::AuthError;

/// Maps an [`AuthError`] to an HTTP status code.
///
/// Credential failures are 401; hashing and signing faults are 500; service
/// errors keep their own mapping.
pub fn auth_error_to_status_code(error: &AuthError) -> u16 {
    match error {
        AuthError::Unauthorized | AuthError::InvalidCredentials => 401,
        AuthError::Hashing(_) | AuthError::Signing(_) => 500,
        AuthError::Service(inner) => service_error_to_status_code(inner),
    }
}
