use super::{AuthError, TokenClaims};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Adaptive, salted password hashing.
///
/// Implementations are CPU-bound; async callers should run them on the
/// blocking pool.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into an opaque, self-describing string.
    fn hash(&self, password: &str) -> Result<String>;

    /// Checks a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for malformed hashes.
    fn verify(&self, hash: &str, password: &str) -> Result<bool>;
}

/// Signs and verifies bearer token claims with a process-wide secret.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, claims: &TokenClaims) -> Result<String>;

    /// Verifies signature and expiry and returns the embedded claims.
    fn verify(&self, token: &str) -> Result<TokenClaims>;
}
