//! Handlers for user account endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::pagination::{Page, PaginationParams};
use crate::api::dto::users::{
    AvatarRequest, AvatarResponse, RegisterRequest, RegisteredUserResponse, SetPasswordRequest,
    UserResponse,
};
use crate::api::extractors::{AuthUser, MaybeUser, RequestUrl};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /api/users/`
///
/// # Request Body
///
/// ```json
/// {
///   "email": "cook@example.com",
///   "username": "cook",
///   "first_name": "Ivan",
///   "last_name": "Petrov",
///   "password": "s3cret-pass"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if a field is invalid, the password is too weak,
/// or the email or username is taken.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredUserResponse>), AppError> {
    payload.validate()?;

    let user = state.user_service.register(payload.into(), false).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Lists users, paginated.
///
/// # Endpoint
///
/// `GET /api/users/?page=1&limit=10`
pub async fn user_list_handler(
    State(state): State<AppState>,
    viewer: MaybeUser,
    RequestUrl(url): RequestUrl,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    let (offset, limit) = params.validate_and_get_offset_limit()?;

    let (users, count) = state.user_service.list(offset, limit).await?;
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    let subscribed = state
        .user_service
        .subscribed_among(viewer.as_ref(), &ids)
        .await?;

    let page = Page::new(users, count, &params, &url)?.map(|user| {
        let is_subscribed = subscribed.contains(&user.id);
        UserResponse::new(user, is_subscribed, state.media.as_ref())
    });

    Ok(Json(page))
}

/// Returns a single user.
///
/// # Endpoint
///
/// `GET /api/users/{id}/`
///
/// # Errors
///
/// Returns 404 Not Found if the user does not exist.
pub async fn user_detail_handler(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get(id).await?;
    let subscribed = state
        .user_service
        .subscribed_among(viewer.as_ref(), &[user.id])
        .await?;
    let is_subscribed = subscribed.contains(&user.id);

    Ok(Json(UserResponse::new(
        user,
        is_subscribed,
        state.media.as_ref(),
    )))
}

/// Returns the caller's own profile.
///
/// # Endpoint
///
/// `GET /api/users/me/`
pub async fn me_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<UserResponse> {
    Json(UserResponse::new(user, false, state.media.as_ref()))
}

/// Changes the caller's password.
///
/// # Endpoint
///
/// `POST /api/users/set_password/`
///
/// # Errors
///
/// Returns 400 Bad Request if `current_password` is wrong or the new
/// password is too weak.
pub async fn set_password_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<SetPasswordRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state
        .user_service
        .set_password(&user, &payload.current_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Replaces the caller's avatar.
///
/// # Endpoint
///
/// `PUT /api/users/me/avatar/`
///
/// # Request Body
///
/// ```json
/// { "avatar": "data:image/png;base64,iVBORw0KGgo..." }
/// ```
pub async fn set_avatar_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<AvatarRequest>,
) -> Result<Json<AvatarResponse>, AppError> {
    payload.validate()?;

    let path = state.user_service.set_avatar(&user, &payload.avatar).await?;

    Ok(Json(AvatarResponse {
        avatar: state.media.url(&path),
    }))
}

/// Removes the caller's avatar.
///
/// # Endpoint
///
/// `DELETE /api/users/me/avatar/`
pub async fn delete_avatar_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, AppError> {
    state.user_service.remove_avatar(&user).await?;
    Ok(StatusCode::NO_CONTENT)
}
