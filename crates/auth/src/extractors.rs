//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;
use portfolio_core::auth::{extract_bearer, Identity};

use crate::error::AuthError;
use crate::AuthState;

/// Header consulted when no `Authorization` header is present.
const TOKEN_HEADER: &str = "token";

/// Extractor for the authenticated caller. Rejects with 401 before the
/// handler runs.
///
/// The token is read from `Authorization: Bearer`, then the `token` header,
/// then the auth cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = token_from_parts(parts, &auth_state.config.cookie_name).ok_or_else(|| {
            tracing::debug!("Request carries no token");
            AuthError::unauthorized()
        })?;

        let identity = auth_state.manager.validate_token(&token).await?;
        Ok(CurrentUser(identity))
    }
}

fn token_from_parts(parts: &Parts, cookie_name: &str) -> Option<String> {
    // API clients
    if let Some(value) = parts.headers.get(AUTHORIZATION) {
        return value
            .to_str()
            .ok()
            .and_then(extract_bearer)
            .map(str::to_string);
    }

    if let Some(value) = parts.headers.get(TOKEN_HEADER) {
        let token = value.to_str().ok()?.trim();
        return (!token.is_empty()).then(|| token.to_string());
    }

    // Browsers
    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}
