use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use portfolio_core::auth::{
    claims_for, is_token_expired, AuthError, Identity, IssuedToken, Result, TokenSigner,
};
use portfolio_core::portfolio::{User, UserDraft};
use portfolio_core::service::PortfolioService;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::signer::JwtSigner;

/// Password verified against on unknown emails so both login paths hash.
const DUMMY_PASSWORD: &str = "portfolio-login-dummy";

/// Issues and validates bearer tokens and checks passwords.
#[derive(Clone)]
pub struct CredentialManager {
    service: PortfolioService,
    signer: Arc<dyn TokenSigner>,
    ttl: Duration,
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialManager {
    pub fn new(service: PortfolioService, signer: Arc<dyn TokenSigner>, ttl: Duration) -> Self {
        Self {
            service,
            signer,
            ttl,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// A manager signing HS256 tokens with the configured secret.
    pub fn from_config(service: PortfolioService, config: &AuthConfig) -> Self {
        Self::new(
            service,
            Arc::new(JwtSigner::new(&config.jwt_secret)),
            config.token_ttl,
        )
    }

    pub fn service(&self) -> &PortfolioService {
        &self.service
    }

    pub fn issue_token(&self, user: &User) -> Result<IssuedToken> {
        self.issue_token_at(user, Utc::now())
    }

    pub fn issue_token_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<IssuedToken> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|_| AuthError::Signing(format!("token lifetime out of range: {:?}", self.ttl)))?;
        let claims = claims_for(user, issued_at, ttl)?;
        let token = self.signer.sign(&claims)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::Signing(format!("expiry out of range: {}", claims.exp)))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Resolves a token to the identity of a user that still exists.
    ///
    /// Every failure is `Unauthorized`; the cause is only logged.
    pub async fn validate_token(&self, token: &str) -> Result<Identity> {
        self.validate_token_at(token, Utc::now()).await
    }

    pub async fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity> {
        let claims = self.signer.verify(token).map_err(|_| AuthError::Unauthorized)?;
        if is_token_expired(&claims, now) {
            tracing::debug!(sub = %claims.sub, "Token expired");
            return Err(AuthError::Unauthorized);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::debug!(sub = %claims.sub, "Token subject is not a user id");
            AuthError::Unauthorized
        })?;

        match self.service.read_user(user_id).await {
            Ok(user) => Ok(Identity {
                user_id: user.id,
                email: user.email,
            }),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%user_id, "Token subject no longer exists");
                Err(AuthError::Unauthorized)
            }
            Err(e) => {
                tracing::error!(%user_id, error = %e, "Failed to resolve token subject");
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Checks a password and issues a token.
    ///
    /// An unknown email and a wrong password fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, IssuedToken)> {
        let user = match self.service.read_user_with_email(email).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                self.burn_verify(password).await;
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        self.check_password(&user, password).await?;

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// Creates the account and issues its first token.
    pub async fn signup(&self, draft: UserDraft) -> Result<(User, IssuedToken)> {
        let user = self.service.create_user(draft).await?;
        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Replaces the password after checking the current one.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: String,
    ) -> Result<()> {
        let user = self.service.read_user(user_id).await?;
        self.check_password(&user, current_password).await?;
        self.service.change_password(user_id, new_password).await?;
        Ok(())
    }

    /// Runs one verification against a throwaway hash, so an unknown email
    /// costs the same as a wrong password.
    async fn burn_verify(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.service.hash_password(DUMMY_PASSWORD.to_string()))
            .await;
        match dummy {
            Ok(hash) => {
                let _ = self
                    .service
                    .verify_password(hash.clone(), password.to_string())
                    .await;
            }
            Err(e) => tracing::warn!(error = %e, "Failed to prepare dummy hash"),
        }
    }

    async fn check_password(&self, user: &User, password: &str) -> Result<()> {
        let matches = self
            .service
            .verify_password(user.password_hash.clone(), password.to_string())
            .await?;
        if !matches {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use portfolio_core::auth::PasswordHasher;
    use portfolio_core::portfolio::UserKey;
    use portfolio_core::service::testing::{service_with, FailPoint, MemoryStore};
    use portfolio_core::service::ServiceError;

    fn manager(store: Arc<MemoryStore>) -> CredentialManager {
        CredentialManager::new(
            service_with(store),
            Arc::new(JwtSigner::new("test-secret")),
            Duration::from_secs(30 * 60),
        )
    }

    async fn signed_up(manager: &CredentialManager) -> (User, IssuedToken) {
        manager
            .signup(UserDraft::new("a@x.com", "secret").with_name("Ada", "Lovelace"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn issued_token_validates_to_owner() {
        let manager = manager(MemoryStore::new());
        let (user, issued) = signed_up(&manager).await;

        let identity = manager.validate_token(&issued.token).await.unwrap();

        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.email, "a@x.com");
        assert!(issued.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn token_for_deleted_user_is_unauthorized() {
        let manager = manager(MemoryStore::new());
        let (user, issued) = signed_up(&manager).await;

        manager
            .service()
            .delete_user(&UserKey::Id(user.id))
            .await
            .unwrap();

        let result = manager.validate_token(&issued.token).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let manager = manager(MemoryStore::new());
        let (user, _) = signed_up(&manager).await;
        let issued = manager.issue_token(&user).unwrap();

        let later = issued.expires_at + chrono::Duration::seconds(1);
        let result = manager.validate_token_at(&issued.token, later).await;

        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn tampered_token_is_unauthorized() {
        let manager = manager(MemoryStore::new());
        let (_, issued) = signed_up(&manager).await;

        let tampered = format!("{}x", issued.token);

        assert!(matches!(
            manager.validate_token(&tampered).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn store_fault_during_validation_is_unauthorized() {
        let store = MemoryStore::new();
        let manager = manager(store.clone());
        let (_, issued) = signed_up(&manager).await;
        store.fail_on(FailPoint::GetUser);

        let result = manager.validate_token(&issued.token).await;

        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let manager = manager(MemoryStore::new());
        let (user, _) = signed_up(&manager).await;

        let (logged_in, issued) = manager.login("a@x.com", "secret").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert_eq!(
            manager.validate_token(&issued.token).await.unwrap().email,
            "a@x.com"
        );

        let wrong = manager.login("a@x.com", "nope").await;
        let unknown = manager.login("b@x.com", "secret").await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn oversized_lifetime_fails_without_panicking() {
        let manager = CredentialManager::new(
            service_with(MemoryStore::new()),
            Arc::new(JwtSigner::new("test-secret")),
            Duration::from_secs(1_000_000_000_000 * 60),
        );

        let result = manager.signup(UserDraft::new("a@x.com", "secret")).await;

        assert!(matches!(result, Err(AuthError::Signing(_))));
    }

    /// Fake hasher that counts verifications.
    #[derive(Default)]
    struct CountingHasher {
        verifies: AtomicUsize,
    }

    impl PasswordHasher for CountingHasher {
        fn hash(&self, password: &str) -> Result<String> {
            Ok(format!("counted${password}"))
        }

        fn verify(&self, hash: &str, password: &str) -> Result<bool> {
            self.verifies.fetch_add(1, Ordering::SeqCst);
            Ok(hash.strip_prefix("counted$") == Some(password))
        }
    }

    #[tokio::test]
    async fn unknown_email_still_verifies_a_hash() {
        let store = MemoryStore::new();
        let hasher = Arc::new(CountingHasher::default());
        let service = PortfolioService::new(store.clone(), store, hasher.clone());
        let manager = CredentialManager::new(
            service,
            Arc::new(JwtSigner::new("test-secret")),
            Duration::from_secs(30 * 60),
        );
        manager
            .signup(UserDraft::new("a@x.com", "secret"))
            .await
            .unwrap();

        let wrong = manager.login("a@x.com", "nope").await;
        assert_eq!(hasher.verifies.load(Ordering::SeqCst), 1);

        let unknown = manager.login("b@x.com", "nope").await;
        assert_eq!(hasher.verifies.load(Ordering::SeqCst), 2);

        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn signup_duplicate_is_conflict() {
        let manager = manager(MemoryStore::new());
        signed_up(&manager).await;

        let result = manager.signup(UserDraft::new("a@x.com", "other")).await;

        assert!(matches!(
            result,
            Err(AuthError::Service(ServiceError::Conflict { .. }))
        ));
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let manager = manager(MemoryStore::new());
        let (user, _) = signed_up(&manager).await;

        let wrong = manager
            .change_password(user.id, "nope", "next".to_string())
            .await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

        manager
            .change_password(user.id, "secret", "next".to_string())
            .await
            .unwrap();
        assert!(manager.login("a@x.com", "next").await.is_ok());
        assert!(manager.login("a@x.com", "secret").await.is_err());
    }
}
