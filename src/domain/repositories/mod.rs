//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access; concrete PostgreSQL implementations
//! live in `crate::infrastructure::persistence`.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - User accounts
//! - [`TokenRepository`] - Authentication tokens
//! - [`SubscriptionRepository`] - Author subscriptions
//! - [`TagRepository`] / [`IngredientRepository`] - Catalog data
//! - [`RecipeRepository`] - Recipes with tags and ingredients
//! - [`CollectionRepository`] - Favorites and shopping cart
//! - [`ShortLinkRepository`] - Short link mappings
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod collection_repository;
pub mod ingredient_repository;
pub mod recipe_repository;
pub mod short_link_repository;
pub mod subscription_repository;
pub mod tag_repository;
pub mod token_repository;
pub mod user_repository;

pub use collection_repository::{CollectionRepository, RecipeCollection};
pub use ingredient_repository::IngredientRepository;
pub use recipe_repository::RecipeRepository;
pub use short_link_repository::ShortLinkRepository;
pub use subscription_repository::SubscriptionRepository;
pub use tag_repository::TagRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
#[cfg(test)]
pub use ingredient_repository::MockIngredientRepository;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
#[cfg(test)]
pub use tag_repository::MockTagRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
