//! Core domain entities.
//!
//! Entities are plain data structures mirroring persisted rows. Types
//! prefixed with `New` carry input for creating records; [`RecipeUpdate`]
//! replaces an existing recipe's content.
//!
//! # Entity Types
//!
//! - [`User`] - A registered account
//! - [`Tag`] / [`Ingredient`] - Catalog data referenced by recipes
//! - [`Recipe`] - A published recipe with tags and ingredient amounts
//! - [`ShortLink`] - Short token mapping for shareable recipe links

pub mod ingredient;
pub mod recipe;
pub mod short_link;
pub mod tag;
pub mod user;

pub use ingredient::{Ingredient, NewIngredient};
pub use recipe::{
    IngredientAmount, MembershipFilter, NewRecipe, Recipe, RecipeDetails, RecipeFilter,
    RecipeIngredient, RecipeUpdate, recipe_frontend_path,
};
pub use short_link::ShortLink;
pub use tag::{NewTag, Tag};
pub use user::{NewUser, User};
