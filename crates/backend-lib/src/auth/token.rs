// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Access and refresh token issuing.
//!
//! Access tokens are HS256 JWTs signed with the service secret. The refresh
//! value is a SHA-256 digest over the identity and the secret: it is stable for
//! a given identity and secret and works as a session key, not as a bearer
//! credential.
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use gatekeeper_common::UserId;

/// Token issuing failures
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Absolute expiry, unix seconds
    pub exp: i64,
    pub sub: UserId,
    pub email: String,
    pub phone: String,
}

/// Signs access tokens with a symmetric key shared only by this service
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            secret,
        }
    }

    /// The signing secret, also mixed into refresh values
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Sign an access token expiring at `expiration` (unix seconds)
    pub fn issue_access_token(
        &self,
        subject_id: UserId,
        email: &str,
        phone: &str,
        expiration: i64,
    ) -> Result<String, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let claims = AccessClaims {
            exp: expiration,
            sub: subject_id,
            email: email.to_string(),
            phone: phone.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Check signature and expiry, returning the carried claims
    pub fn decode_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        // `sub` is numeric, so only `exp` goes through the spec-claim checks
        let validation = Validation::new(Algorithm::HS256);

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

/// Hex SHA-256 of `email:phone:secret`. Deterministic: the same identity and
/// secret always yield the same value.
pub fn issue_refresh_token(email: &str, phone: &str, secret: &str) -> String {
    let fingerprint = format!("{email}:{phone}:{secret}");
    hex::encode(Sha256::digest(fingerprint.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_access_token_round_trip() {
        let issuer = TokenIssuer::new("test-secret");
        let exp = Utc::now().timestamp() + 900;

        let token = issuer
            .issue_access_token(42, "a@x.com", "", exp)
            .unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = issuer.decode_access_token(&token).unwrap();
        assert_eq!(
            claims,
            AccessClaims {
                exp,
                sub: 42,
                email: "a@x.com".to_string(),
                phone: String::new(),
            }
        );
    }

    #[test]
    fn test_missing_secret() {
        let issuer = TokenIssuer::new("");
        assert!(matches!(
            issuer.issue_access_token(1, "a@x.com", "", 0),
            Err(TokenError::MissingSecret)
        ));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let exp = Utc::now().timestamp() + 900;
        let token = TokenIssuer::new("one")
            .issue_access_token(1, "a@x.com", "", exp)
            .unwrap();

        assert!(matches!(
            TokenIssuer::new("two").decode_access_token(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = TokenIssuer::new("test-secret");
        // Well past the default 60s leeway
        let exp = Utc::now().timestamp() - 3600;
        let token = issuer.issue_access_token(1, "a@x.com", "", exp).unwrap();

        assert!(matches!(
            issuer.decode_access_token(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_refresh_token_is_deterministic() {
        let first = issue_refresh_token("a@x.com", "", "S");
        let second = issue_refresh_token("a@x.com", "", "S");

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_refresh_token_depends_on_every_input() {
        let base = issue_refresh_token("a@x.com", "", "S");

        assert_ne!(base, issue_refresh_token("b@x.com", "", "S"));
        assert_ne!(base, issue_refresh_token("a@x.com", "1", "S"));
        assert_ne!(base, issue_refresh_token("a@x.com", "", "T"));
    }

    #[test]
    fn test_refresh_token_known_vector() {
        // sha256("::")
        assert_eq!(
            issue_refresh_token("", "", ""),
            "71546855d6279ef70d20909b292c42c2dcb02cd06bde01485da52d13e304ebf4"
        );
    }
}
