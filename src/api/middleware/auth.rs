//! Token authentication middleware.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::domain::entities::User;
use crate::{error::AppError, state::AppState};

/// Authenticated caller, stored in request extensions by [`layer`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolves the caller from the `Authorization` header.
///
/// # Header Format
///
/// ```text
/// Authorization: Token <key>
/// Authorization: Bearer <key>
/// ```
///
/// A request without the header passes through anonymously; handlers decide
/// whether they need a user (see [`crate::api::extractors`]). On success the
/// user is inserted as [`CurrentUser`].
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is present but malformed, or the
/// token is unknown.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = auth_token(req.headers())? {
        let user = st.auth_service.authenticate(&token).await?;
        tracing::debug!(user_id = user.id, "Request authenticated");
        req.extensions_mut().insert(CurrentUser(user));
    }

    Ok(next.run(req).await)
}

/// Extracts the raw key from the `Authorization` header, if any.
fn auth_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let malformed = || {
        AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "Authorization header is missing or invalid" }),
        )
    };

    let value = value.to_str().map_err(|_| malformed())?.trim();
    let (scheme, key) = value.split_once(' ').ok_or_else(malformed)?;

    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return Err(malformed());
    }

    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return Err(malformed());
    }

    Ok(Some(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        map
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(auth_token(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_token_scheme() {
        assert_eq!(
            auth_token(&headers("Token abc123")).unwrap().as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_bearer_scheme_is_accepted() {
        assert_eq!(
            auth_token(&headers("Bearer abc123")).unwrap().as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(
            auth_token(&headers("token abc123")).unwrap().as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        assert!(auth_token(&headers("Basic dXNlcjpwYXNz")).is_err());
    }

    #[test]
    fn test_missing_key_is_rejected() {
        assert!(auth_token(&headers("Token")).is_err());
        assert!(auth_token(&headers("Token  ")).is_err());
    }

    #[test]
    fn test_key_with_spaces_is_rejected() {
        assert!(auth_token(&headers("Token abc def")).is_err());
    }
}
