//! Application state shared by every handler.
//!
//! Holds the consistency service and the auth state. The store backend
//! behind the service is chosen at compile time (see `crate::storage`).

use std::sync::Arc;

use portfolio_auth::{Argon2Hasher, AuthConfig, AuthState, CredentialManager};
use portfolio_core::service::PortfolioService;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub service: PortfolioService,
    pub auth: AuthState,
}

impl AppState {
    /// Wires a service into the credential manager that shares it.
    pub fn with_service(service: PortfolioService, auth_config: AuthConfig) -> Self {
        let manager = CredentialManager::from_config(service.clone(), &auth_config);
        Self {
            service,
            auth: AuthState::new(manager, auth_config),
        }
    }

    /// Creates state backed by process-local tables.
    #[cfg(feature = "inmemory")]
    pub async fn from_config(config: &Config, auth_config: AuthConfig) -> anyhow::Result<Self> {
        use crate::storage::InMemoryRepository;

        tracing::info!(
            users_table = %config.users_table,
            projects_table = %config.projects_table,
            "Using in-memory storage"
        );
        let repo = Arc::new(InMemoryRepository::new());
        let service = PortfolioService::new(repo.clone(), repo, Arc::new(Argon2Hasher::default()));
        Ok(Self::with_service(service, auth_config))
    }

    /// Creates state backed by the DynamoDB tables named in the config.
    #[cfg(feature = "dynamodb")]
    pub async fn from_config(config: &Config, auth_config: AuthConfig) -> anyhow::Result<Self> {
        use crate::storage::DynamoDbRepository;

        let repo = Arc::new(DynamoDbRepository::from_config(config).await);
        let service = PortfolioService::new(repo.clone(), repo, Arc::new(Argon2Hasher::default()));
        Ok(Self::with_service(service, auth_config))
    }
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

#[cfg(test)]
impl AppState {
    /// State over a shared memory store with a fast fake hasher.
    pub fn for_tests(store: Arc<portfolio_core::service::testing::MemoryStore>) -> Self {
        Self::with_service(
            portfolio_core::service::testing::service_with(store),
            AuthConfig::new("test-secret"),
        )
    }
}
