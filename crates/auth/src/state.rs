//! Application state for auth.

use axum::extract::FromRef;

use crate::config::AuthConfig;
use crate::manager::CredentialManager;

/// Shared state for auth handlers and the `CurrentUser` extractor.
#[derive(Clone)]
pub struct AuthState {
    pub manager: CredentialManager,
    pub config: AuthConfig,
}

impl AuthState {
    pub fn new(manager: CredentialManager, config: AuthConfig) -> Self {
        Self { manager, config }
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
