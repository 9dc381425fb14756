//! Repository trait for user authentication tokens.

use crate::domain::entities::User;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for authentication tokens.
///
/// Only HMAC hashes of tokens are stored; raw tokens are shown to the
/// client once at login and never persisted.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Stores a new token hash for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the hash already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_token(&self, user_id: i64, token_hash: &str) -> Result<(), AppError>;

    /// Returns the owner of a token hash, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_user_by_token(&self, token_hash: &str) -> Result<Option<User>, AppError>;

    /// Updates the `last_used_at` timestamp for a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Deletes every token of a user and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_user_tokens(&self, user_id: i64) -> Result<u64, AppError>;
}
