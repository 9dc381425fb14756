//! Handlers for read-only tag and ingredient endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::catalog::{IngredientResponse, IngredientSearchParams, TagResponse};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/tags/`
pub async fn tag_list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = state.catalog_service.list_tags().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// `GET /api/tags/{id}/`
pub async fn tag_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TagResponse>, AppError> {
    Ok(Json(state.catalog_service.get_tag(id).await?.into()))
}

/// Lists ingredients, optionally filtered by a case-insensitive substring
/// of the name.
///
/// # Endpoint
///
/// `GET /api/ingredients/?name=sug`
pub async fn ingredient_list_handler(
    State(state): State<AppState>,
    Query(params): Query<IngredientSearchParams>,
) -> Result<Json<Vec<IngredientResponse>>, AppError> {
    let ingredients = state.catalog_service.list_ingredients(params.name).await?;
    Ok(Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

/// `GET /api/ingredients/{id}/`
pub async fn ingredient_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<IngredientResponse>, AppError> {
    Ok(Json(state.catalog_service.get_ingredient(id).await?.into()))
}
