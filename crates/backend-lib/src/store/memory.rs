// ============================
// crates/backend-lib/src/store/memory.rs
// ============================
//! In-process [`ExpiringStore`] used by tests and single-node deployments.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use gatekeeper_common::Subject;

use super::{ExpiringStore, StoreError};
use crate::cache::ConcurrentMap;

#[derive(Clone)]
struct Entry {
    bytes: Vec<u8>,
    expires_at: Instant,
}

/// Expiring store backed by a [`ConcurrentMap`].
///
/// Values are kept in their serialized form so decoding behaves the same
/// way it does against Redis.
#[derive(Clone)]
pub struct MemoryStore {
    entries: ConcurrentMap<String, Entry>,
    ttl: Duration,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: ConcurrentMap::new(),
            ttl,
        }
    }

    /// Store raw bytes under `key` with the store TTL
    pub fn set_raw(&self, key: &str, bytes: Vec<u8>) {
        self.entries.set(
            key.to_string(),
            Entry {
                bytes,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        self.entries.retain(|_, entry| now < entry.expires_at)
    }

    /// Number of entries, including ones that expired but were not purged
    pub fn len(&self) -> usize {
        self.entries.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ExpiringStore for MemoryStore {
    async fn set(&self, key: &str, value: &Subject) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.set_raw(key, bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Subject, StoreError> {
        let key = key.to_string();
        let entry = self.entries.get(&key).ok_or(StoreError::NotFound)?;

        let now = Instant::now();
        if now >= entry.expires_at {
            // A concurrent set may have replaced the entry since it was read
            self.entries.remove_if(&key, |current| now >= current.expires_at);
            return Err(StoreError::NotFound);
        }

        Ok(serde_json::from_slice(&entry.bytes)?)
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.entries.delete(&key.to_string());
        Ok(())
    }
}
