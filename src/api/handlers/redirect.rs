//! Handler for short link redirects.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;

use crate::api::extractors::RequestUrl;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short token to the recipe page it was issued for.
///
/// # Endpoint
///
/// `GET /s/{token}/`
///
/// # Response
///
/// `302 Found` with `Location: <scheme://host><full_path>`, where the
/// scheme and host are those of the incoming request.
///
/// # Errors
///
/// Returns 404 Not Found if the token is unknown.
/// Returns 400 Bad Request if the Host header is missing or invalid.
pub async fn redirect_handler(
    State(state): State<AppState>,
    url: RequestUrl,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let full_path = state.short_link_service.resolve(&token).await?;
    let location = format!("{}{}", url.host_with_schema()?, full_path);

    debug!(token = %token, location = %location, "Short link resolved");

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
