//! Repository trait for ingredients.

use crate::domain::entities::{Ingredient, NewIngredient};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the ingredient catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Creates an ingredient.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name is taken.
    async fn create(&self, new_ingredient: NewIngredient) -> Result<Ingredient, AppError>;

    /// Lists ingredients ordered by name, optionally keeping only names
    /// that contain `name_contains` (case-insensitive).
    async fn list(&self, name_contains: Option<String>) -> Result<Vec<Ingredient>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Ingredient>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Ingredient>, AppError>;

    /// Returns the subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError>;
}
