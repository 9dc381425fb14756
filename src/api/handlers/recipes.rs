//! Handlers for recipe endpoints.

use axum::{
    Json,
    extract::{Path, Query, RawQuery, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::api::dto::pagination::Page;
use crate::api::dto::recipes::{
    RecipeListParams, RecipeResponse, RecipeWriteRequest, ShortLinkResponse, tag_slugs,
};
use crate::api::extractors::{AuthUser, MaybeUser, RequestUrl};
use crate::error::AppError;
use crate::state::AppState;

const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// Lists recipes, newest first.
///
/// # Endpoint
///
/// `GET /api/recipes/?page=1&limit=6&author=3&tags=breakfast&tags=lunch&is_favorited=1`
///
/// # Filters
///
/// - `author` - author id
/// - `tags` - tag slug, repeatable; a recipe matches if it has any of them
/// - `is_favorited`, `is_in_shopping_cart` - `1` for members only, `0` for
///   non-members; anonymous callers get an empty list
///
/// # Errors
///
/// Returns 400 Bad Request for an unknown tag slug or a flag other than
/// `0` or `1`.
pub async fn recipe_list_handler(
    State(state): State<AppState>,
    viewer: MaybeUser,
    RequestUrl(url): RequestUrl,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<RecipeListParams>,
) -> Result<Json<Page<RecipeResponse>>, AppError> {
    let (offset, limit) = params.pagination.validate_and_get_offset_limit()?;
    let query = params.to_query(tag_slugs(raw_query.as_deref()))?;

    let (recipes, count) = state
        .recipe_service
        .list(viewer.as_ref(), query, offset, limit)
        .await?;

    let page = Page::new(recipes, count, &params.pagination, &url)?
        .map(|details| RecipeResponse::new(details, state.media.as_ref()));

    Ok(Json(page))
}

/// Returns a single recipe.
///
/// # Endpoint
///
/// `GET /api/recipes/{id}/`
///
/// # Errors
///
/// Returns 404 Not Found if the recipe does not exist.
pub async fn recipe_detail_handler(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<RecipeResponse>, AppError> {
    let details = state.recipe_service.get(viewer.as_ref(), id).await?;
    Ok(Json(RecipeResponse::new(details, state.media.as_ref())))
}

/// Publishes a recipe.
///
/// # Endpoint
///
/// `POST /api/recipes/`
///
/// # Request Body
///
/// ```json
/// {
///   "ingredients": [{ "id": 1123, "amount": 10 }],
///   "tags": [1, 2],
///   "image": "data:image/png;base64,iVBORw0KGgo...",
///   "name": "Omelette",
///   "text": "Beat the eggs.",
///   "cooking_time": 5
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request on invalid fields, empty or duplicated tags and
/// ingredients, unknown ids, or a bad image payload.
pub async fn create_recipe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<RecipeWriteRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    payload.validate()?;

    let details = state.recipe_service.create(&user, payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecipeResponse::new(details, state.media.as_ref())),
    ))
}

/// Replaces a recipe's content. `image` may be omitted to keep the current
/// one.
///
/// # Endpoint
///
/// `PATCH /api/recipes/{id}/`
///
/// # Errors
///
/// - 400 Bad Request on invalid content
/// - 403 Forbidden unless the caller is the author or staff
/// - 404 Not Found if the recipe does not exist
pub async fn update_recipe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<RecipeWriteRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    payload.validate()?;

    let details = state
        .recipe_service
        .update(&user, id, payload.into())
        .await?;

    Ok(Json(RecipeResponse::new(details, state.media.as_ref())))
}

/// Deletes a recipe.
///
/// # Endpoint
///
/// `DELETE /api/recipes/{id}/`
pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.recipe_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns a shareable short link for a recipe, creating it on first use.
///
/// # Endpoint
///
/// `GET /api/recipes/{id}/get-link/`
///
/// # Response
///
/// ```json
/// { "short-link": "https://foodgram.example/s/aB3xYz/" }
/// ```
pub async fn get_link_handler(
    State(state): State<AppState>,
    url: RequestUrl,
    Path(id): Path<i64>,
) -> Result<Json<ShortLinkResponse>, AppError> {
    let recipe = state.recipe_service.find(id).await?;

    let (link, created) = state
        .short_link_service
        .get_or_create(&recipe.frontend_path())
        .await?;

    if created {
        tracing::info!(recipe_id = recipe.id, token = %link.short_token, "Short link created");
    }

    Ok(Json(ShortLinkResponse {
        short_link: state
            .short_link_service
            .short_url(url.host_with_schema()?, &link),
    }))
}

/// Downloads the caller's aggregated shopping list as a text file.
///
/// # Endpoint
///
/// `GET /api/recipes/download_shopping_cart/`
///
/// # Response
///
/// ```text
/// flour (g) - 150
/// egg (pc) - 2
/// ```
pub async fn download_shopping_cart_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let body = state.recipe_service.shopping_list(&user).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=UTF-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SHOPPING_LIST_FILENAME),
            ),
        ],
        body,
    ))
}
