//! Repository trait for recipes.

use crate::domain::entities::{
    NewRecipe, Recipe, RecipeFilter, RecipeIngredient, RecipeUpdate, Tag,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for recipes and their tag/ingredient links.
///
/// Writes that touch several tables (`create`, `update`) run inside one
/// transaction so a recipe is never visible without its tags and
/// ingredients.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRecipeRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_recipe.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Creates a recipe with its tags and ingredient amounts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the same ingredient is listed twice.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_recipe: NewRecipe) -> Result<Recipe, AppError>;

    /// Replaces a recipe's content, tags and ingredients.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the recipe does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, update: RecipeUpdate) -> Result<Recipe, AppError>;

    /// Deletes a recipe. Returns `Ok(false)` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Finds a recipe by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, AppError>;

    /// Lists recipes matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(
        &self,
        filter: RecipeFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Recipe>, AppError>;

    /// Counts recipes matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self, filter: RecipeFilter) -> Result<i64, AppError>;

    /// Returns `(recipe_id, tag)` pairs for the given recipes, ordered by
    /// recipe then tag name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn tags_for(&self, recipe_ids: &[i64]) -> Result<Vec<(i64, Tag)>, AppError>;

    /// Returns `(recipe_id, ingredient)` pairs for the given recipes in the
    /// order the ingredients were added.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn ingredients_for(
        &self,
        recipe_ids: &[i64],
    ) -> Result<Vec<(i64, RecipeIngredient)>, AppError>;

    /// Lists an author's recipes, newest first, up to `limit` when given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_author(
        &self,
        author_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<Recipe>, AppError>;

    /// Returns `(author_id, recipe_count)` for the given authors. Authors
    /// without recipes are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_authors(&self, author_ids: &[i64]) -> Result<Vec<(i64, i64)>, AppError>;
}
