//! Repository trait for short link persistence.

use crate::domain::entities::ShortLink;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short link mappings.
///
/// The store enforces uniqueness of both `full_path` and `short_token`.
/// Callers rely on this to detect races: a conflicting insert surfaces as
/// [`AppError::Conflict`] carrying the violated constraint name.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_short_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `full_path` or `short_token` is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, full_path: &str, short_token: &str) -> Result<ShortLink, AppError>;

    /// Finds the mapping for a resource path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_full_path(&self, full_path: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds the mapping for a token. Tokens are case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_token(&self, short_token: &str) -> Result<Option<ShortLink>, AppError>;

    /// Checks whether a token is already used.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn token_exists(&self, short_token: &str) -> Result<bool, AppError>;

    /// Counts stored mappings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
