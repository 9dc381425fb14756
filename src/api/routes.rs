//! API route configuration.
//!
//! Paths are declared without trailing slashes; the top-level router trims
//! them from incoming requests, so `/api/recipes/` and `/api/recipes` are
//! the same endpoint. Authentication is resolved by
//! [`crate::api::middleware::auth`] and enforced per handler.

use crate::api::handlers::{
    add_favorite_handler, add_to_shopping_cart_handler, create_recipe_handler,
    delete_avatar_handler, delete_recipe_handler, download_shopping_cart_handler,
    get_link_handler, ingredient_detail_handler, ingredient_list_handler, login_handler,
    logout_handler, me_handler, recipe_detail_handler, recipe_list_handler, register_handler,
    remove_favorite_handler, remove_from_shopping_cart_handler, set_avatar_handler,
    set_password_handler, subscribe_handler, subscriptions_handler, tag_detail_handler,
    tag_list_handler, unsubscribe_handler, update_recipe_handler, user_detail_handler,
    user_list_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Account routes that get the stricter rate limit.
///
/// - `POST   /api/users`              - Register
/// - `POST   /api/auth/token/login`   - Obtain a token
/// - `POST   /api/auth/token/logout`  - Revoke own tokens
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(register_handler))
        .route("/api/auth/token/login", post(login_handler))
        .route("/api/auth/token/logout", post(logout_handler))
}

/// All other API routes.
///
/// # Endpoints
///
/// - `GET    /api/users`                           - List users
/// - `GET    /api/users/me`                        - Own profile
/// - `PUT    /api/users/me/avatar`                 - Set avatar
/// - `DELETE /api/users/me/avatar`                 - Remove avatar
/// - `POST   /api/users/set_password`              - Change password
/// - `GET    /api/users/subscriptions`             - Followed authors
/// - `GET    /api/users/{id}`                      - User profile
/// - `POST   /api/users/{id}/subscribe`            - Follow
/// - `DELETE /api/users/{id}/subscribe`            - Unfollow
/// - `GET    /api/tags`, `/api/tags/{id}`          - Tags
/// - `GET    /api/ingredients`, `/api/ingredients/{id}` - Ingredients
/// - `GET    /api/recipes`                         - List recipes
/// - `POST   /api/recipes`                         - Create recipe
/// - `GET    /api/recipes/download_shopping_cart`  - Shopping list file
/// - `GET    /api/recipes/{id}`                    - Recipe
/// - `PATCH  /api/recipes/{id}`                    - Update recipe
/// - `DELETE /api/recipes/{id}`                    - Delete recipe
/// - `GET    /api/recipes/{id}/get-link`           - Short link
/// - `POST   /api/recipes/{id}/favorite`           - Add to favorites
/// - `DELETE /api/recipes/{id}/favorite`           - Remove from favorites
/// - `POST   /api/recipes/{id}/shopping_cart`      - Add to cart
/// - `DELETE /api/recipes/{id}/shopping_cart`      - Remove from cart
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(user_list_handler))
        .route("/api/users/me", get(me_handler))
        .route(
            "/api/users/me/avatar",
            put(set_avatar_handler).delete(delete_avatar_handler),
        )
        .route("/api/users/set_password", post(set_password_handler))
        .route("/api/users/subscriptions", get(subscriptions_handler))
        .route("/api/users/{id}", get(user_detail_handler))
        .route(
            "/api/users/{id}/subscribe",
            post(subscribe_handler).delete(unsubscribe_handler),
        )
        .route("/api/tags", get(tag_list_handler))
        .route("/api/tags/{id}", get(tag_detail_handler))
        .route("/api/ingredients", get(ingredient_list_handler))
        .route("/api/ingredients/{id}", get(ingredient_detail_handler))
        .route(
            "/api/recipes",
            get(recipe_list_handler).post(create_recipe_handler),
        )
        .route(
            "/api/recipes/download_shopping_cart",
            get(download_shopping_cart_handler),
        )
        .route(
            "/api/recipes/{id}",
            get(recipe_detail_handler)
                .patch(update_recipe_handler)
                .delete(delete_recipe_handler),
        )
        .route("/api/recipes/{id}/get-link", get(get_link_handler))
        .route(
            "/api/recipes/{id}/favorite",
            post(add_favorite_handler).delete(remove_favorite_handler),
        )
        .route(
            "/api/recipes/{id}/shopping_cart",
            post(add_to_shopping_cart_handler).delete(remove_from_shopping_cart_handler),
        )
}
