// ============================
// crates/backend-lib/src/store/mod.rs
// ============================
//! Expiring key/value storage for session subjects.
//!
//! Every backend applies a single store-wide TTL on `set`; there is no
//! per-key expiry.
use async_trait::async_trait;
use gatekeeper_common::Subject;
use thiserror::Error;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Failures reported by an [`ExpiringStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key absent or already expired
    #[error("key not found")]
    NotFound,

    /// Stored bytes do not decode into a subject
    #[error("stored value could not be decoded: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Backend unreachable, connection dropped or deadline elapsed
    #[error("store transport error: {0}")]
    Transport(String),
}

/// Capability interface over an expiring key/value backend
#[async_trait]
pub trait ExpiringStore: Send + Sync {
    /// Write `value` under `key`, replacing any prior entry and its TTL
    async fn set(&self, key: &str, value: &Subject) -> Result<(), StoreError>;

    /// Read the subject stored under `key`
    async fn get(&self, key: &str) -> Result<Subject, StoreError>;

    /// Remove `key`; a missing key is not an error
    async fn del(&self, key: &str) -> Result<(), StoreError>;
}
