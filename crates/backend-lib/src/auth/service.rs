use async_trait::async_trait;
use gatekeeper_common::{SignInRequest, SignInResponse, SignUpRequest, SignUpResponse, Subject};

use super::AuthError;

/// Signup, signin and session lookup over the credential stores.
///
/// Implementations hold no per-request state; every call is independent.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new identity and return its public fields
    async fn sign_up(&self, req: SignUpRequest) -> Result<SignUpResponse, AuthError>;

    /// Check credentials and issue an access token plus refresh value
    async fn sign_in(&self, req: SignInRequest) -> Result<SignInResponse, AuthError>;

    /// Subject stored for a refresh value, `NotFound` when absent or expired
    async fn session(&self, refresh_token: &str) -> Result<Subject, AuthError>;

    /// Drop the session stored for a refresh value
    async fn sign_out(&self, refresh_token: &str) -> Result<(), AuthError>;
}
