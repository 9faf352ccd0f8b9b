// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `Gatekeeper` auth server.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod store;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthError, AuthService, DefaultAuth};
use crate::config::Settings;
use crate::repository::UserRepository;
use crate::store::ExpiringStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Settings, immutable after startup
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state around the given collaborators
    pub fn new(
        settings: Settings,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn ExpiringStore>,
    ) -> Result<Self, AuthError> {
        let auth = Arc::new(DefaultAuth::from_settings(&settings.auth, users, sessions)?);

        Ok(Self {
            auth,
            settings: Arc::new(settings),
        })
    }
}
