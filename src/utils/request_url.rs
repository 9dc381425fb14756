//! Reconstruction of the absolute request URL from HTTP headers.
//!
//! Axum only sees the path and query of an incoming request. Short links and
//! pagination links need the full `scheme://host/path?query`, which is rebuilt
//! from the `Host` header and, behind a trusted proxy, from
//! `X-Forwarded-Proto` / `X-Forwarded-Host`.

use crate::AppError;
use axum::http::{HeaderMap, Uri, header};
use serde_json::json;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Returns the `host[:port]` the client addressed.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the `Host` header is missing, is not
/// valid UTF-8, or is empty.
pub fn request_host(headers: &HeaderMap, behind_proxy: bool) -> Result<String, AppError> {
    if behind_proxy
        && let Some(forwarded) = first_forwarded_value(headers, X_FORWARDED_HOST)
    {
        return Ok(forwarded);
    }

    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?
        .trim();

    if host.is_empty() {
        return Err(AppError::bad_request("Invalid Host header", json!({})));
    }

    Ok(host.to_string())
}

/// Returns `http` or `https`.
///
/// Only `X-Forwarded-Proto` can select `https`, and only when the service is
/// configured as running behind a proxy.
pub fn request_scheme(headers: &HeaderMap, behind_proxy: bool) -> &'static str {
    if behind_proxy
        && let Some(proto) = first_forwarded_value(headers, X_FORWARDED_PROTO)
        && proto.eq_ignore_ascii_case("https")
    {
        return "https";
    }

    "http"
}

/// Rebuilds the absolute URL of the current request.
///
/// HTTP/2 requests carry no `Host` header; the URI authority is used then.
///
/// # Errors
///
/// See [`request_host`].
pub fn absolute_request_url(
    headers: &HeaderMap,
    uri: &Uri,
    behind_proxy: bool,
) -> Result<String, AppError> {
    let scheme = request_scheme(headers, behind_proxy);
    let host = match request_host(headers, behind_proxy) {
        Ok(host) => host,
        Err(err) => uri.authority().map(|a| a.to_string()).ok_or(err)?,
    };
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    Ok(format!("{}://{}{}", scheme, host, path_and_query))
}

/// First comma-separated value of a forwarding header.
fn first_forwarded_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
