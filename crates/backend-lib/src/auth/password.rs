// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};
use thiserror::Error;
use zeroize::Zeroize;

use crate::config::AuthSettings;

/// Password hashing failures
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordError {
    /// KDF parameters rejected or salt generation failed
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Plaintext does not match the digest
    #[error("password mismatch")]
    Mismatch,
}

/// scrypt hasher with a cost fixed per deployment.
///
/// Digests are PHC strings, so the salt and parameters travel with the
/// digest and verification needs nothing else.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self, PasswordError> {
        let params = Params::new(log_n, r, p, Params::RECOMMENDED_LEN)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(Self { params })
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, PasswordError> {
        Self::new(settings.hash_log_n, settings.hash_r, settings.hash_p)
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Hash a password and zeroize the original
    pub fn hash_secure(&self, plain: &mut String) -> Result<String, PasswordError> {
        let hash = self.hash(plain);
        plain.zeroize();
        hash
    }

    /// Verify a password against a digest produced by [`PasswordHasher::hash`].
    ///
    /// A digest that cannot be parsed never matches.
    pub fn verify(&self, hash: &str, plain: &str) -> Result<(), PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::Mismatch)?;
        Scrypt
            .verify_password(plain.as_bytes(), &parsed_hash)
            .map_err(|_| PasswordError::Mismatch)
    }
}
