//! Handlers for author subscriptions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::dto::pagination::{Page, PaginationParams};
use crate::api::dto::users::{RecipesLimitParams, SubscriptionResponse};
use crate::api::extractors::{AuthUser, RequestUrl};
use crate::error::AppError;
use crate::state::AppState;

/// Follows an author.
///
/// # Endpoint
///
/// `POST /api/users/{id}/subscribe/?recipes_limit=3`
///
/// # Errors
///
/// - 400 Bad Request on self-subscription or if already subscribed
/// - 404 Not Found if the author does not exist
pub async fn subscribe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(author_id): Path<i64>,
    Query(limit): Query<RecipesLimitParams>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    let entry = state
        .user_service
        .subscribe(&user, author_id, limit.limit())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::new(entry, state.media.as_ref())),
    ))
}

/// Stops following an author.
///
/// # Endpoint
///
/// `DELETE /api/users/{id}/subscribe/`
///
/// # Errors
///
/// - 400 Bad Request if there was no subscription
/// - 404 Not Found if the author does not exist
pub async fn unsubscribe_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(author_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.user_service.unsubscribe(&user, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists followed authors with their recipe previews.
///
/// # Endpoint
///
/// `GET /api/users/subscriptions/?page=1&limit=10&recipes_limit=3`
pub async fn subscriptions_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    RequestUrl(url): RequestUrl,
    Query(params): Query<PaginationParams>,
    Query(limit): Query<RecipesLimitParams>,
) -> Result<Json<Page<SubscriptionResponse>>, AppError> {
    let (offset, page_size) = params.validate_and_get_offset_limit()?;

    let (authors, count) = state
        .user_service
        .subscriptions(&user, offset, page_size, limit.limit())
        .await?;

    let page = Page::new(authors, count, &params, &url)?
        .map(|entry| SubscriptionResponse::new(entry, state.media.as_ref()));

    Ok(Json(page))
}
