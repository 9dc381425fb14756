//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Login, token authentication and logout
//! - [`services::user_service::UserService`] - Accounts, avatars and subscriptions
//! - [`services::catalog_service::CatalogService`] - Tags and ingredients
//! - [`services::recipe_service::RecipeService`] - Recipes, favorites and shopping cart
//! - [`services::short_link_service::ShortLinkService`] - Short link creation and resolution

pub mod services;
