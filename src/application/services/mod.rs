//! Business logic services for the application layer.

pub mod auth_service;
pub mod catalog_service;
pub mod recipe_service;
pub mod short_link_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use catalog_service::{CatalogService, ImportReport};
pub use recipe_service::{RecipeDraft, RecipeQuery, RecipeService};
pub use short_link_service::ShortLinkService;
pub use user_service::{AuthorWithRecipes, Registration, UserService};
