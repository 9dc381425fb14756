//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Reports whether the database and media storage are usable.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: At least one check failed
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "media": { "status": "ok", "message": "Writable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let checks = HealthChecks {
        database: check_database(&state).await,
        media: check_media(&state).await,
    };

    let (code, status) = if checks.all_ok() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }),
    )
}

async fn check_database(state: &AppState) -> CheckStatus {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.pool.as_ref())
        .await
    {
        Ok(_) => CheckStatus::ok("Connected"),
        Err(e) => {
            tracing::error!(error = %e, "Health check database query failed");
            CheckStatus::error(format!("Database error: {}", e))
        }
    }
}

async fn check_media(state: &AppState) -> CheckStatus {
    match state.media.check().await {
        Ok(()) => CheckStatus::ok("Writable"),
        Err(e) => {
            tracing::error!(error = %e, "Health check media storage failed");
            CheckStatus::error(e.to_string())
        }
    }
}
