// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! exchanged between `Gatekeeper` clients and the auth backend.
//! This module defines the JSON request/response bodies and the session
//! subject stored in the expiring key-value store.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a user by the repository
pub type UserId = u64;

/// Body of `POST /auth/signup`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SignUpRequest {
    /// Email address; may be empty when `phone` is set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// Phone number; may be empty when `email` is set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    /// Plaintext password
    pub password: String,
}

/// Body of `POST /auth/signin`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SignInRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    pub password: String,
}

/// Successful signup. The password hash is never echoed back.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignUpResponse {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

/// Successful signin
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SignInResponse {
    /// Signed HS256 access token
    pub access_token: String,
    /// Hex digest correlation handle for the session
    pub refresh_token: String,
    /// Access token expiry as unix seconds
    pub expiration: i64,
}

/// Identity data kept against a session key in the expiring store
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Subject {
    pub id: UserId,
    pub email: String,
    pub phone: String,
    pub roles: Vec<String>,
}

/// Error body returned by every failing endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error code and human readable message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
