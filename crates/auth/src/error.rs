use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portfolio_core::auth::auth_error_to_status_code;
use serde_json::json;
use thiserror::Error;

/// Auth errors for the portfolio_auth crate.
///
/// Wraps the core `AuthError` and adds startup configuration failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Core(#[from] portfolio_core::auth::AuthError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    pub fn unauthorized() -> Self {
        Self::Core(portfolio_core::auth::AuthError::Unauthorized)
    }
}

impl From<portfolio_core::service::ServiceError> for AuthError {
    fn from(error: portfolio_core::service::ServiceError) -> Self {
        Self::Core(error.into())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Core(core_err) => StatusCode::from_u16(auth_error_to_status_code(core_err))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AuthError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Auth request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
