//! Password hashing and policy checks.
//!
//! Hashes are Argon2id PHC strings with a random salt per password.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde_json::json;

use crate::error::AppError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hash error: {0}")]
    Hash(String),
    #[error("Password verify error: {0}")]
    Verify(String),
}

/// Hashes a password with Argon2id.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Checks a password against a stored hash.
///
/// Returns `Ok(false)` on mismatch and an error only when the stored hash
/// cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| PasswordError::Verify(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Rejects passwords that are too short or entirely numeric.
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the offending field.
pub fn validate_password_policy(field: &str, password: &str) -> Result<(), AppError> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "Password must contain at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("Password cannot be entirely numeric".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Password is too weak",
            json!({ field: problems }),
        ))
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::internal("Password processing failed", json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_hash_uses_random_salt() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("anything", "not-a-hash").is_err());
    }

    #[test]
    fn test_policy_accepts_reasonable_password() {
        assert!(validate_password_policy("password", "s3cret-pass").is_ok());
    }

    #[test]
    fn test_policy_rejects_short_password() {
        let err = validate_password_policy("password", "abc").unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_policy_rejects_numeric_password() {
        let err = validate_password_policy("new_password", "1234567890").unwrap_err();
        match err {
            AppError::Validation { details, .. } => {
                assert!(details.get("new_password").is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
