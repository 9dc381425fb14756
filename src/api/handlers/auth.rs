//! Handlers for token login and logout.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse};
use crate::api::extractors::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges credentials for an API token.
///
/// # Endpoint
///
/// `POST /api/auth/token/login/`
///
/// # Response
///
/// ```json
/// { "auth_token": "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request with `non_field_errors` if the credentials are
/// wrong.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let auth_token = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse { auth_token }))
}

/// Revokes every token of the caller.
///
/// # Endpoint
///
/// `POST /api/auth/token/logout/`
pub async fn logout_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, AppError> {
    state.auth_service.logout(&user).await?;
    Ok(StatusCode::NO_CONTENT)
}
