// ============================
// crates/backend-lib/src/repository.rs
// ============================
//! User repository abstraction with an in-memory implementation.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

use gatekeeper_common::UserId;

/// Repository failures
#[derive(Error, Debug)]
pub enum RepoError {
    /// No user matches the selector
    #[error("user not exists")]
    NotExists,

    /// Unique constraint on email or phone violated
    #[error("unique constraint violated on {0}")]
    Conflict(&'static str),

    /// Database unreachable or deadline elapsed
    #[error("repository transport error: {0}")]
    Transport(String),

    #[error("repository error: {0}")]
    Other(String),
}

/// Durable account record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub phone: String,
    /// scrypt PHC digest
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub blocked_at: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a user; the repository assigns the rest
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Email-or-phone lookup key. Empty fields are ignored; set fields must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSelector {
    pub email: String,
    pub phone: String,
}

impl UserSelector {
    pub fn new(email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            phone: phone.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.phone.is_empty()
    }

    fn matches(&self, user: &User) -> bool {
        !self.is_empty()
            && (self.email.is_empty() || self.email == user.email)
            && (self.phone.is_empty() || self.phone == user.phone)
    }
}

/// Storage of credential identities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Whether a live user matches the selector
    async fn exists(&self, selector: &UserSelector) -> Result<bool, RepoError>;

    /// Insert a user, enforcing uniqueness of non-empty email and phone
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    /// Fetch the live user matching the selector
    async fn get(&self, selector: &UserSelector) -> Result<User, RepoError>;
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<User>,
    next_id: UserId,
}

/// In-process repository; soft-deleted rows are invisible to lookups
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    table: Arc<RwLock<Table>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user as deleted without removing the row
    pub fn soft_delete(&self, id: UserId) -> bool {
        let mut table = self.table.write();
        match table.rows.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn exists(&self, selector: &UserSelector) -> Result<bool, RepoError> {
        let table = self.table.read();
        Ok(table
            .rows
            .iter()
            .any(|u| u.deleted_at.is_none() && selector.matches(u)))
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let mut table = self.table.write();

        // Uniqueness holds across soft-deleted rows, like a plain UNIQUE index
        for row in &table.rows {
            if !user.email.is_empty() && row.email == user.email {
                return Err(RepoError::Conflict("email"));
            }
            if !user.phone.is_empty() && row.phone == user.phone {
                return Err(RepoError::Conflict("phone"));
            }
        }

        table.next_id += 1;
        let created = User {
            id: table.next_id,
            email: user.email,
            phone: user.phone,
            password: user.password,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
            blocked_at: None,
        };
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn get(&self, selector: &UserSelector) -> Result<User, RepoError> {
        let table = self.table.read();
        table
            .rows
            .iter()
            .find(|u| u.deleted_at.is_none() && selector.matches(u))
            .cloned()
            .ok_or(RepoError::NotExists)
    }
}
