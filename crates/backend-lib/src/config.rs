// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `GATEKEEPER_AUTH__TOKEN_SECRET`
pub const ENV_PREFIX: &str = "GATEKEEPER_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Token and password hashing settings
    pub auth: AuthSettings,
    /// Session store settings
    pub redis: RedisSettings,
}

/// Token lifetimes, signing secret and password hashing cost
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC secret used to sign access tokens
    pub token_secret: String,
    /// Access token lifetime in seconds
    pub access_expire_secs: u64,
    /// Refresh/session lifetime in seconds
    pub refresh_expire_secs: u64,
    /// scrypt cost parameter (log2 of N)
    pub hash_log_n: u8,
    /// scrypt block size
    pub hash_r: u32,
    /// scrypt parallelism
    pub hash_p: u32,
}

/// Connection and expiry settings for the session store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    /// `host:port` of the Redis server
    pub addr: String,
    /// Database index
    pub db: i64,
    pub user: String,
    pub pass: String,
    /// TTL applied to every session entry, in seconds; falls back to
    /// `auth.refresh_expire_secs` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
    /// Deadline for a single store command, in milliseconds
    pub op_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_level: "info".to_string(),
            log_json: false,
            auth: AuthSettings::default(),
            redis: RedisSettings::default(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            access_expire_secs: 15 * 60,          // 15 minutes
            refresh_expire_secs: 60 * 60 * 24 * 7, // 7 days
            hash_log_n: 15,
            hash_r: 8,
            hash_p: 1,
        }
    }
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:6379".to_string(),
            db: 0,
            user: String::new(),
            pass: String::new(),
            ttl_secs: None,
            op_timeout_ms: 2_000,
        }
    }
}

impl AuthSettings {
    pub fn access_expire(&self) -> Duration {
        Duration::from_secs(self.access_expire_secs)
    }
}

impl RedisSettings {
    /// Split `addr` into host and port; IPv6 hosts may be bracketed
    pub fn host_port(&self) -> Result<(String, u16)> {
        let Some((host, port)) = self.addr.rsplit_once(':') else {
            bail!("redis.addr must be host:port, got {}", self.addr);
        };
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            bail!("redis.addr has an empty host");
        }
        let port: u16 = port
            .parse()
            .map_err(|_| anyhow::anyhow!("redis.addr has an invalid port: {port}"))?;
        Ok((host.to_string(), port))
    }

    /// Connection parameters with credentials passed through verbatim
    pub fn connection_info(&self) -> Result<ConnectionInfo> {
        let (host, port) = self.host_port()?;
        let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());

        Ok(ConnectionInfo {
            addr: ConnectionAddr::Tcp(host, port),
            redis: RedisConnectionInfo {
                db: self.db,
                username: non_empty(&self.user),
                password: non_empty(&self.pass),
                ..Default::default()
            },
        })
    }
}

impl Settings {
    /// Load from `config.{toml,yaml,json}` in the working directory plus env overrides
    pub fn load() -> Result<Self> {
        let settings: Settings = Self::base()
            .merge(Toml::file("config.toml"))
            .merge(Yaml::file("config.yaml"))
            .merge(Json::file("config.json"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from an explicit TOML file plus env overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Self::base()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Lifetime of a stored session
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.redis.ttl_secs.unwrap_or(self.auth.refresh_expire_secs))
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if self.auth.token_secret.is_empty() {
            bail!("auth.token_secret is required");
        }
        if self.auth.access_expire_secs == 0 {
            bail!("auth.access_expire_secs must be positive");
        }
        if self.auth.refresh_expire_secs == 0 {
            bail!("auth.refresh_expire_secs must be positive");
        }
        self.redis.host_port()?;
        if !(0..=15).contains(&self.redis.db) {
            bail!("redis.db must be between 0 and 15");
        }
        if self.redis.ttl_secs == Some(0) {
            bail!("redis.ttl_secs must be positive");
        }
        Ok(())
    }
}
