// ============================
// crates/backend-lib/src/auth/error.rs
// ============================
//! Classified failures of the auth service.
use thiserror::Error;

use super::password::PasswordError;
use super::token::TokenError;
use crate::repository::RepoError;
use crate::store::StoreError;

/// Error classes returned by [`super::AuthService`].
///
/// Collaborator errors are folded into these variants; the message keeps the
/// underlying cause for logs while the variant decides what the caller sees.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("user already exists")]
    UserAlreadyExists,

    /// Unknown identity and wrong password are deliberately the same error
    #[error("wrong username or password")]
    WrongUsernameOrPassword,

    #[error("no active session")]
    NotFound,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether retrying the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Transport(_))
    }
}

impl From<RepoError> for AuthError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Conflict(_) => AuthError::UserAlreadyExists,
            RepoError::Transport(msg) => AuthError::Transport(format!("repository: {msg}")),
            other => AuthError::Internal(format!("repository: {other}")),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AuthError::NotFound,
            StoreError::Transport(msg) => AuthError::Transport(format!("session store: {msg}")),
            other => AuthError::Internal(format!("session store: {other}")),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Mismatch => AuthError::WrongUsernameOrPassword,
            PasswordError::Hashing(msg) => AuthError::Internal(format!("password hash: {msg}")),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Internal(format!("token: {err}"))
    }
}
