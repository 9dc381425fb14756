//! Repository trait for author subscriptions.

use crate::domain::entities::User;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user → author subscriptions.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSubscriptionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Subscribes `user_id` to `author_id`.
    ///
    /// Returns `Ok(false)` if the subscription already existed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn subscribe(&self, user_id: i64, author_id: i64) -> Result<bool, AppError>;

    /// Removes a subscription. Returns `Ok(false)` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn unsubscribe(&self, user_id: i64, author_id: i64) -> Result<bool, AppError>;

    /// Returns the subset of `author_ids` that `user_id` is subscribed to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn subscribed_author_ids(
        &self,
        user_id: i64,
        author_ids: &[i64],
    ) -> Result<Vec<i64>, AppError>;

    /// Lists the authors a user follows, most recent subscription first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_authors(&self, user_id: i64, offset: i64, limit: i64)
    -> Result<Vec<User>, AppError>;

    /// Counts the authors a user follows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_authors(&self, user_id: i64) -> Result<i64, AppError>;
}
