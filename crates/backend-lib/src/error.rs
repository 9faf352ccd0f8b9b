// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Missing header: {0}")]
    MissingHeader(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MissingHeader(_) | AppError::Json(_) => {
                StatusCode::BAD_REQUEST
            },
            AppError::Auth(err) => match err {
                AuthError::Validation(_)
                | AuthError::UserAlreadyExists
                | AuthError::WrongUsernameOrPassword => StatusCode::BAD_REQUEST,
                AuthError::NotFound => StatusCode::UNAUTHORIZED,
                AuthError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
                AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::MissingHeader(_) => "VAL_002",
            AppError::Json(_) => "JSON_001",
            AppError::Auth(err) => match err {
                AuthError::Validation(_) => "VAL_001",
                AuthError::UserAlreadyExists => "AUTH_001",
                AuthError::WrongUsernameOrPassword => "AUTH_002",
                AuthError::NotFound => "AUTH_003",
                AuthError::Transport(_) => "TRN_001",
                AuthError::Internal(_) => "INT_001",
            },
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation(err) => err.to_string(),
            AppError::MissingHeader(name) => format!("Missing header: {name}"),
            AppError::Json(_) => "Invalid request format".to_string(),
            AppError::Auth(err) => match err {
                AuthError::Validation(msg) => msg.clone(),
                AuthError::UserAlreadyExists => "User already exists".to_string(),
                AuthError::WrongUsernameOrPassword => "Wrong username or password".to_string(),
                AuthError::NotFound => "No active session".to_string(),
                AuthError::Transport(_) => {
                    "Service temporarily unavailable, please try again later".to_string()
                },
                AuthError::Internal(_) => "An internal server error occurred".to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            error!(code = error_code, error = %self, "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        // Create a JSON response with error details
        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
