use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use portfolio_core::auth::{AuthError, PasswordHasher, Result};
use rand_core::OsRng;

/// Argon2id with a random per-password salt, stored as a PHC string.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom cost parameters. Lower costs are only meant for tests.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify(&self, hash: &str, password: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
        // Parameters come from the PHC string, not from `self.params`.
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Hasher {
        Argon2Hasher::with_params(Params::new(8, 1, 1, None).unwrap())
    }

    #[test]
    fn hash_is_salted_phc_string() {
        let hasher = cheap();
        let first = hasher.hash("secret").unwrap();
        let second = hasher.hash("secret").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, "secret");
        assert_ne!(first, second);
    }

    #[test]
    fn verify_accepts_right_and_rejects_wrong_password() {
        let hasher = cheap();
        let hash = hasher.hash("secret").unwrap();

        assert!(hasher.verify(&hash, "secret").unwrap());
        assert!(!hasher.verify(&hash, "Secret").unwrap());
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let result = cheap().verify("secret", "secret");
        assert!(matches!(result, Err(AuthError::Hashing(_))));
    }
}
