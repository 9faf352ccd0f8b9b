// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request validation module.

use gatekeeper_common::{SignInRequest, SignUpRequest};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_PASSWORD_LENGTH: usize = 128;

// `+,\-.` covers the range `+` through `.`
static PASSWORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9!#$%&*+,\-.:;<=>?@^_{|}~]+$").unwrap());

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("either phone or email is required")]
    MissingIdentifier,

    #[error("Invalid password: {0}")]
    InvalidPassword(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// At least one of email and phone must be present; their shape is not checked
pub fn validate_identifiers(email: &str, phone: &str) -> ValidationResult<()> {
    if email.is_empty() && phone.is_empty() {
        return Err(ValidationError::MissingIdentifier);
    }
    Ok(())
}

/// Validate a password against the allowed character set
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password is required".to_string(),
        ));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password cannot exceed {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    if !PASSWORD_REGEX.is_match(password) {
        return Err(ValidationError::InvalidPassword(
            "Password contains characters that are not allowed".to_string(),
        ));
    }

    Ok(password)
}

pub fn validate_sign_up(req: &SignUpRequest) -> ValidationResult<()> {
    validate_identifiers(&req.email, &req.phone)?;
    validate_password(&req.password)?;
    Ok(())
}

pub fn validate_sign_in(req: &SignInRequest) -> ValidationResult<()> {
    validate_identifiers(&req.email, &req.phone)?;
    validate_password(&req.password)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifiers() {
        assert!(validate_identifiers("a@x.com", "").is_ok());
        assert!(validate_identifiers("", "79990001122").is_ok());
        assert!(validate_identifiers("a@x.com", "+79990001122").is_ok());

        // Identifier shape is left to the caller
        assert!(validate_identifiers("not-an-email", "").is_ok());
        assert!(validate_identifiers("", "call-me").is_ok());

        assert_eq!(
            validate_identifiers("", ""),
            Err(ValidationError::MissingIdentifier)
        );
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Abc123!").is_ok());
        assert!(validate_password("p@ss-w0rd_{ok}~").is_ok());
        assert!(validate_password("Abc,123").is_ok());
        assert!(validate_password("+,-.").is_ok());

        // Empty password
        assert!(matches!(
            validate_password(""),
            Err(ValidationError::InvalidPassword(_))
        ));

        // Whitespace and quotes are outside the allowed set
        assert!(matches!(
            validate_password("has space1"),
            Err(ValidationError::InvalidPassword(_))
        ));
        assert!(matches!(
            validate_password("quote\"d"),
            Err(ValidationError::InvalidPassword(_))
        ));

        // Too long
        let long = "a".repeat(129);
        assert!(matches!(
            validate_password(&long),
            Err(ValidationError::InvalidPassword(_))
        ));
    }

    #[test]
    fn test_validate_requests() {
        let req = SignUpRequest {
            email: "a@x.com".to_string(),
            phone: String::new(),
            password: "Abc123!".to_string(),
        };
        assert!(validate_sign_up(&req).is_ok());

        let req = SignInRequest {
            email: String::new(),
            phone: String::new(),
            password: "Abc123!".to_string(),
        };
        assert_eq!(validate_sign_in(&req), Err(ValidationError::MissingIdentifier));
    }
}
