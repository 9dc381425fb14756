//! Repository trait for per-user recipe collections (favorites and the
//! shopping cart).

use crate::domain::shopping_list::UsageRow;
use crate::error::AppError;
use async_trait::async_trait;

/// A per-user set of recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCollection {
    Favorites,
    ShoppingCart,
}

impl RecipeCollection {
    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "favorites",
            RecipeCollection::ShoppingCart => "shopping_cart",
        }
    }

    /// Human readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "favorites",
            RecipeCollection::ShoppingCart => "shopping cart",
        }
    }
}

/// Repository interface for favorites and shopping cart entries.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCollectionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Adds a recipe to a collection. Returns `Ok(false)` if it was already there.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn add(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, AppError>;

    /// Removes a recipe from a collection. Returns `Ok(false)` if it was not there.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn remove(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, AppError>;

    /// Returns the subset of `recipe_ids` present in the user's collection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn contained_ids(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<Vec<i64>, AppError>;

    /// Returns one row per ingredient use across the user's cart, ordered by
    /// when the recipe was added and then by the recipe's ingredient order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn shopping_cart_rows(&self, user_id: i64) -> Result<Vec<UsageRow>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_tables() {
        assert_eq!(RecipeCollection::Favorites.table(), "favorites");
        assert_eq!(RecipeCollection::ShoppingCart.table(), "shopping_cart");
        assert_eq!(RecipeCollection::ShoppingCart.label(), "shopping cart");
    }
}
