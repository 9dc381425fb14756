//! Recipe entity and its write/read companions.

use chrono::{DateTime, Utc};

use super::{Tag, User};

/// A published recipe.
///
/// `image` holds a media storage path relative to the media root.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub pub_date: DateTime<Utc>,
}

impl Recipe {
    /// Frontend path of the recipe page, used as the short link target.
    pub fn frontend_path(&self) -> String {
        recipe_frontend_path(self.id)
    }
}

/// Frontend path for a recipe id.
pub fn recipe_frontend_path(recipe_id: i64) -> String {
    format!("/recipes/{}/", recipe_id)
}

/// An ingredient as used by one recipe.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RecipeIngredient {
    /// Ingredient id (not the association row id).
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Ingredient reference submitted when writing a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: i64,
    pub amount: i32,
}

/// Input data for creating a recipe. The image is already stored.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub tag_ids: Vec<i64>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Replacement data for an existing recipe.
///
/// Tags and ingredients are always replaced as a whole. `image: None`
/// keeps the current image.
#[derive(Debug, Clone)]
pub struct RecipeUpdate {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    pub tag_ids: Vec<i64>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Membership condition on one of the viewer's recipe collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipFilter {
    pub user_id: i64,
    /// `true` keeps recipes in the collection, `false` keeps the rest.
    pub included: bool,
}

/// Recipe list filters.
///
/// `tag_slugs` matches recipes having any of the given tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author_id: Option<i64>,
    pub tag_slugs: Vec<String>,
    pub favorited: Option<MembershipFilter>,
    pub in_shopping_cart: Option<MembershipFilter>,
}

/// Fully resolved recipe as seen by a particular viewer.
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub author: User,
    pub author_subscribed: bool,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}
