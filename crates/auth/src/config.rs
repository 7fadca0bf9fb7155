use std::time::Duration;

use crate::error::AuthError;

/// Signing secret used when `JWT_SECRET` is unset outside production.
const DEV_JWT_SECRET: &str = "portfolio-dev-secret-change-me";

const DEFAULT_TOKEN_TTL_MINUTES: u64 = 30;
/// Tokens never outlive the cookie that carries them.
const MAX_TOKEN_TTL_MINUTES: u64 = 30 * 24 * 60;
const COOKIE_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Complete auth configuration, read once at startup.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub cookie_max_age: Duration,
}

impl AuthConfig {
    /// Builds a configuration with defaults around the given secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_MINUTES * 60),
            cookie_name: "token".to_string(),
            cookie_secure: false,
            cookie_max_age: COOKIE_MAX_AGE,
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HMAC secret for token signing (required in production)
    /// - `TOKEN_TTL_MINUTES`: Token lifetime in minutes, 1 to 43200 (default: 30)
    /// - `COOKIE_SECURE`: Whether to set secure flag on cookies (default: production)
    ///
    /// # Errors
    ///
    /// Returns `Config` if `JWT_SECRET` is missing in production or a value
    /// does not parse.
    pub fn from_env(production: bool) -> Result<Self, AuthError> {
        Self::from_lookup(production, |name| std::env::var(name).ok())
    }

    /// Same as [`AuthConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(
        production: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AuthError> {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ if production => {
                return Err(AuthError::Config(
                    "JWT_SECRET must be set in production".to_string(),
                ))
            }
            _ => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let token_ttl = match lookup("TOKEN_TTL_MINUTES") {
            Some(raw) => parse_ttl_minutes(&raw)?,
            None => Duration::from_secs(DEFAULT_TOKEN_TTL_MINUTES * 60),
        };

        let cookie_secure = lookup("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(production);

        Ok(Self {
            cookie_secure,
            ..Self::new(jwt_secret).with_token_ttl(token_ttl)
        })
    }
}

fn parse_ttl_minutes(raw: &str) -> Result<Duration, AuthError> {
    let minutes = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| AuthError::Config(format!("TOKEN_TTL_MINUTES is not a number: {raw}")))?;
    if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) {
        return Err(AuthError::Config(format!(
            "TOKEN_TTL_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}: {minutes}"
        )));
    }
    Ok(Duration::from_secs(minutes * 60))
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_max_age", &self.cookie_max_age)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AuthConfig::new("s3cret");
        assert_eq!(config.token_ttl, Duration::from_secs(30 * 60));
        assert_eq!(config.cookie_name, "token");
        assert_eq!(config.cookie_max_age, Duration::from_secs(2_592_000));
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn missing_secret_in_production_is_an_error() {
        let result = AuthConfig::from_lookup(true, lookup(&[]));
        assert!(matches!(result, Err(AuthError::Config(_))));

        let blank = AuthConfig::from_lookup(true, lookup(&[("JWT_SECRET", "  ")]));
        assert!(matches!(blank, Err(AuthError::Config(_))));
    }

    #[test]
    fn missing_secret_outside_production_falls_back() {
        let config = AuthConfig::from_lookup(false, lookup(&[])).unwrap();

        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.token_ttl, Duration::from_secs(30 * 60));
        assert!(!config.cookie_secure);
    }

    #[test]
    fn production_reads_secret_and_secures_cookie() {
        let config = AuthConfig::from_lookup(
            true,
            lookup(&[("JWT_SECRET", "s3cret"), ("TOKEN_TTL_MINUTES", "60")]),
        )
        .unwrap();

        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.token_ttl, Duration::from_secs(60 * 60));
        assert!(config.cookie_secure);
    }

    #[test]
    fn token_ttl_must_be_a_bounded_positive_number() {
        for raw in ["abc", "0", "-5", "43201", "1000000000000"] {
            let result = AuthConfig::from_lookup(false, lookup(&[("TOKEN_TTL_MINUTES", raw)]));
            assert!(
                matches!(result, Err(AuthError::Config(_))),
                "{raw} should be rejected"
            );
        }

        let longest =
            AuthConfig::from_lookup(false, lookup(&[("TOKEN_TTL_MINUTES", "43200")])).unwrap();
        assert_eq!(longest.token_ttl, longest.cookie_max_age);
    }

    #[test]
    fn debug_redacts_secret() {
        let debug = format!("{:?}", AuthConfig::new("s3cret"));
        assert!(!debug.contains("s3cret"));
    }
}
