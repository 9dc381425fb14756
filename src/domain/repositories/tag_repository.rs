//! Repository trait for tags.

use crate::domain::entities::{NewTag, Tag};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for recipe tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name or slug is taken.
    async fn create(&self, new_tag: NewTag) -> Result<Tag, AppError>;

    /// Lists all tags ordered by name.
    async fn list(&self) -> Result<Vec<Tag>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, AppError>;

    /// Returns the subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError>;

    /// Returns the subset of `slugs` that exist.
    async fn existing_slugs(&self, slugs: &[String]) -> Result<Vec<String>, AppError>;
}
