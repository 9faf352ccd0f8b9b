//! Test utilities for the auth backend
//!
//! Builds an application state wired to in-memory collaborators so tests
//! need neither Redis nor a database.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use backend_lib::{
    config::Settings, repository::MemoryUserRepository, router::create_router,
    store::MemoryStore, AppState,
};
use gatekeeper_common::ErrorBody;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-secret";

/// Settings with a signing secret and a cheap password hash
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.token_secret = TEST_SECRET.to_string();
    settings.auth.hash_log_n = 8;
    settings
}

/// Handles to the collaborators behind a test router
pub struct TestEnv {
    pub app: Router,
    pub users: MemoryUserRepository,
    pub sessions: MemoryStore,
}

pub fn setup_test_env() -> TestEnv {
    setup_test_env_with(test_settings())
}

pub fn setup_test_env_with(settings: Settings) -> TestEnv {
    let users = MemoryUserRepository::new();
    let sessions = MemoryStore::new(settings.session_ttl());
    let state = AppState::new(settings, Arc::new(users.clone()), Arc::new(sessions.clone()))
        .expect("Failed to create AppState for test");

    TestEnv {
        app: create_router(Arc::new(state)),
        users,
        sessions,
    }
}

/// POST a JSON body and return the status and decoded body
pub async fn post_json(app: &Router, uri: &str, body: Value) -> (u16, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Send a request carrying the refresh header
pub async fn with_refresh(app: &Router, method: &str, uri: &str, token: &str) -> (u16, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-refresh-token", token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (u16, Value) {
    let response: Response<Body> = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

/// Decode a failing response body into the shared error shape
pub fn error_body(body: Value) -> ErrorBody {
    serde_json::from_value(body).expect("error response should match ErrorBody")
}
