// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod error;
pub mod password;
pub mod token;
mod service;
mod service_impl;

pub use error::AuthError;
pub use password::{PasswordError, PasswordHasher};
pub use service::AuthService;
pub use service_impl::{session_key, DefaultAuth, DEFAULT_ROLE};
pub use token::{issue_refresh_token, AccessClaims, TokenError, TokenIssuer};
