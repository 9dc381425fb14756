//! Handlers for favorites and the shopping cart.
//!
//! Both collections share the same semantics: adding returns the short recipe
//! representation with 201, removing returns 204, and adding twice or
//! removing an absent entry is a 400.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::recipes::ShortRecipeResponse;
use crate::api::extractors::AuthUser;
use crate::domain::repositories::RecipeCollection;
use crate::error::AppError;
use crate::state::AppState;

async fn add(
    state: AppState,
    collection: RecipeCollection,
    AuthUser(user): AuthUser,
    recipe_id: i64,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), AppError> {
    let recipe = state
        .recipe_service
        .add_to(collection, &user, recipe_id)
        .await?;

    tracing::info!(
        user_id = user.id,
        recipe_id,
        collection = collection.label(),
        "Recipe added"
    );

    Ok((
        StatusCode::CREATED,
        Json(ShortRecipeResponse::new(&recipe, state.media.as_ref())),
    ))
}

async fn remove(
    state: AppState,
    collection: RecipeCollection,
    AuthUser(user): AuthUser,
    recipe_id: i64,
) -> Result<StatusCode, AppError> {
    state
        .recipe_service
        .remove_from(collection, &user, recipe_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/recipes/{id}/favorite/`
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), AppError> {
    add(state, RecipeCollection::Favorites, user, id).await
}

/// `DELETE /api/recipes/{id}/favorite/`
pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    remove(state, RecipeCollection::Favorites, user, id).await
}

/// `POST /api/recipes/{id}/shopping_cart/`
pub async fn add_to_shopping_cart_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), AppError> {
    add(state, RecipeCollection::ShoppingCart, user, id).await
}

/// `DELETE /api/recipes/{id}/shopping_cart/`
pub async fn remove_from_shopping_cart_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    remove(state, RecipeCollection::ShoppingCart, user, id).await
}
