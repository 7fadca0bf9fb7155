//! Password and bearer-token authentication for the portfolio backend.
//!
//! This crate provides:
//! - Argon2id password hashing and HS256 token signing
//! - The credential manager (signup, login, token issue and validation)
//! - The `CurrentUser` extractor that gates protected routes
//! - Signup and login handlers

mod config;
mod error;
mod extractors;
mod handlers;
mod hasher;
mod manager;
mod signer;
mod state;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::CurrentUser;
pub use handlers::auth_routes;
pub use hasher::Argon2Hasher;
pub use manager::CredentialManager;
pub use signer::JwtSigner;
pub use state::AuthState;
