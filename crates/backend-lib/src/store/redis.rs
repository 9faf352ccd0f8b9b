// ============================
// crates/backend-lib/src/store/redis.rs
// ============================
//! Redis-backed [`ExpiringStore`].
use std::{future::Future, time::Duration};

use ::redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use async_trait::async_trait;
use gatekeeper_common::Subject;
use tracing::{debug, info};

use super::{ExpiringStore, StoreError};
use crate::config::RedisSettings;

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Session store writing JSON-encoded subjects with `PSETEX key ttl value`.
///
/// The connection manager multiplexes one connection and reconnects on
/// failure; each command is bounded by `op_timeout`.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    ttl: Duration,
    op_timeout: Duration,
}

impl RedisStore {
    /// Connect using the configured address, database and credentials;
    /// every write expires after `ttl`
    pub async fn connect(settings: &RedisSettings, ttl: Duration) -> Result<Self, StoreError> {
        let info = settings
            .connection_info()
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        let client = Client::open(info)?;
        let op_timeout = Duration::from_millis(settings.op_timeout_ms);

        let conn = tokio::time::timeout(op_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Transport("connect timed out".to_string()))??;

        info!(addr = %settings.addr, db = settings.db, "connected to redis");

        Ok(Self {
            conn,
            ttl,
            op_timeout,
        })
    }

    /// TTL applied to every write
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn with_deadline<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, RedisError>>,
    {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Transport(format!(
                "operation exceeded {}ms",
                self.op_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl ExpiringStore for RedisStore {
    async fn set(&self, key: &str, value: &Subject) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        let ttl_ms = u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX);
        let mut conn = self.conn.clone();

        self.with_deadline(conn.pset_ex::<_, _, ()>(key, bytes, ttl_ms))
            .await?;
        debug!(ttl_ms, "session subject stored");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Subject, StoreError> {
        let mut conn = self.conn.clone();
        let bytes: Option<Vec<u8>> = self.with_deadline(conn.get(key)).await?;
        let bytes = bytes.ok_or(StoreError::NotFound)?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        self.with_deadline(conn.del::<_, ()>(key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_error_is_transport() {
        let err = RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(matches!(StoreError::from(err), StoreError::Transport(_)));
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_host_fails_with_transport() {
        let settings = RedisSettings {
            // Reserved TEST-NET address, nothing listens there
            addr: "192.0.2.1:6379".to_string(),
            op_timeout_ms: 100,
            ..RedisSettings::default()
        };

        let result = RedisStore::connect(&settings, Duration::from_secs(60)).await;
        assert!(matches!(result, Err(StoreError::Transport(_))));
    }

    #[tokio::test]
    async fn test_connect_with_malformed_addr_fails_with_transport() {
        let settings = RedisSettings {
            addr: "no-port".to_string(),
            ..RedisSettings::default()
        };

        let result = RedisStore::connect(&settings, Duration::from_secs(60)).await;
        assert!(matches!(result, Err(StoreError::Transport(_))));
    }
}
