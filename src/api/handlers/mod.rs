//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod catalog;
pub mod collections;
pub mod health;
pub mod recipes;
pub mod redirect;
pub mod subscriptions;
pub mod users;

pub use auth::{login_handler, logout_handler};
pub use catalog::{
    ingredient_detail_handler, ingredient_list_handler, tag_detail_handler, tag_list_handler,
};
pub use collections::{
    add_favorite_handler, add_to_shopping_cart_handler, remove_favorite_handler,
    remove_from_shopping_cart_handler,
};
pub use health::health_handler;
pub use recipes::{
    create_recipe_handler, delete_recipe_handler, download_shopping_cart_handler,
    get_link_handler, recipe_detail_handler, recipe_list_handler, update_recipe_handler,
};
pub use redirect::redirect_handler;
pub use subscriptions::{subscribe_handler, subscriptions_handler, unsubscribe_handler};
pub use users::{
    delete_avatar_handler, me_handler, register_handler, set_avatar_handler,
    set_password_handler, user_detail_handler, user_list_handler,
};
