use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portfolio_core::auth::{auth_error_to_status_code, AuthError};
use portfolio_core::service::{service_error_to_status_code, ServiceError};
use portfolio_core::storage::{repository_error_to_status_code, RepositoryError};
use serde_json::json;
use thiserror::Error;

/// The caller is authenticated but may not act on this resource.
#[derive(Debug, Error)]
#[error("forbidden")]
pub struct Forbidden;

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if let Some(err) = self.0.downcast_ref::<ServiceError>() {
            service_error_to_status_code(err)
        } else if let Some(err) = self.0.downcast_ref::<AuthError>() {
            auth_error_to_status_code(err)
        } else if let Some(err) = self.0.downcast_ref::<portfolio_auth::AuthError>() {
            match err {
                portfolio_auth::AuthError::Core(inner) => auth_error_to_status_code(inner),
                portfolio_auth::AuthError::Config(_) => 500,
            }
        } else if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(err)
        } else if self.0.is::<Forbidden>() {
            403
        } else {
            500
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
