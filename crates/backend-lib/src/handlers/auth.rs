// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Auth endpoints: request decoding, validation and response mapping.
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use gatekeeper_common::{SignInRequest, SignInResponse, SignUpRequest, SignUpResponse, Subject};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::validation::{validate_sign_in, validate_sign_up};
use crate::AppState;

/// Header carrying the refresh value for session endpoints
pub const REFRESH_HEADER: &str = "x-refresh-token";

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    Ok(serde_json::from_slice(body)?)
}

fn refresh_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(REFRESH_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::MissingHeader(REFRESH_HEADER))
}

/// `POST /auth/signup`
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SignUpResponse>, AppError> {
    let req: SignUpRequest = parse_body(&body)?;
    validate_sign_up(&req)?;

    Ok(Json(state.auth.sign_up(req).await?))
}

/// `POST /auth/signin`
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SignInResponse>, AppError> {
    let req: SignInRequest = parse_body(&body)?;
    validate_sign_in(&req)?;

    Ok(Json(state.auth.sign_in(req).await?))
}

/// `GET /auth/session`
pub async fn session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Subject>, AppError> {
    let token = refresh_token(&headers)?;
    Ok(Json(state.auth.session(token).await?))
}

/// `POST /auth/signout`
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = refresh_token(&headers)?;
    state.auth.sign_out(token).await?;
    Ok(StatusCode::NO_CONTENT)
}
