mod error;
mod functions;
mod http_mapping;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{calculate_expiry, claims_for, extract_bearer, is_token_expired};
pub use http_mapping::auth_error_to_status_code;
pub use traits::{PasswordHasher, Result, TokenSigner};
pub use types::{Identity, IssuedToken, TokenClaims};
