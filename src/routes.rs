//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /s/{token}`   - Short link redirect (public)
//! - `GET  /health`      - Health check (public)
//! - `/api/*`            - REST API (token optional, required for writes)
//! - `MEDIA_URL/*`       - Uploaded images
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter for account routes
//! - **Authentication** - `Authorization: Token <key>` resolved per request
//! - **Path normalization** - Trailing slash handling

use std::path::Path;

use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::api::routes::{account_routes, api_routes};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `media_url` - URL prefix uploaded images are served under, e.g. `/media/`
/// - `media_root` - directory holding uploaded images
///
/// Rate limiting keys on the peer address, so the router must be served
/// with `into_make_service_with_connect_info::<SocketAddr>`.
pub fn app_router(state: AppState, media_url: &str, media_root: &Path) -> NormalizePath<Router> {
    let router = Router::new()
        .merge(api(&state, true))
        .route("/s/{token}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest_service(
            media_url.trim_end_matches('/'),
            ServeDir::new(media_root),
        )
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// API, redirect and health routes without rate limiting or media serving.
///
/// Used where no peer address is available, such as in-process test servers.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(api(&state, false))
        .route("/s/{token}", get(redirect_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

fn api(state: &AppState, rate_limited: bool) -> Router<AppState> {
    let authenticate = middleware::from_fn_with_state(state.clone(), auth::layer);

    let api = api_routes().route_layer(authenticate.clone());
    let account = account_routes().route_layer(authenticate);

    if rate_limited {
        api.layer(rate_limit::layer())
            .merge(account.layer(rate_limit::secure_layer()))
    } else {
        api.merge(account)
    }
}
