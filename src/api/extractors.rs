//! Request extractors shared by handlers.
//!
//! - [`AuthUser`] - caller that must be authenticated
//! - [`MaybeUser`] - caller that may be anonymous
//! - [`RequestUrl`] - absolute URL of the current request

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use serde_json::json;

use crate::api::middleware::auth::CurrentUser;
use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::host::extract_host_with_schema;
use crate::utils::request_url::absolute_request_url;

/// Authenticated caller. Rejects anonymous requests with `401`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .map(|current| AuthUser(current.0.clone()))
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Authentication credentials were not provided",
                    json!({}),
                )
            })
    }
}

/// Caller if authenticated, `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn as_ref(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            parts
                .extensions
                .get::<CurrentUser>()
                .map(|current| current.0.clone()),
        ))
    }
}

/// Absolute `scheme://host/path?query` of the current request.
#[derive(Debug, Clone)]
pub struct RequestUrl(pub String);

impl RequestUrl {
    /// `scheme://host[:port]` part of the URL.
    pub fn host_with_schema(&self) -> Result<&str, AppError> {
        extract_host_with_schema(&self.0)
            .ok_or_else(|| AppError::bad_request("Invalid Host header", json!({})))
    }
}

impl FromRequestParts<AppState> for RequestUrl {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        absolute_request_url(&parts.headers, &uri, state.behind_proxy).map(RequestUrl)
    }
}
