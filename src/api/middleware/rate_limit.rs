//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::PeerIpKeyExtractor,
};

type PeerIpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter for the public API.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the service must be served with connect info.
pub fn layer() -> PeerIpGovernorLayer {
    governor_layer(2, 100)
}

/// Creates a stricter rate limiter for login, logout and registration.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn secure_layer() -> PeerIpGovernorLayer {
    governor_layer(1, 10)
}

fn governor_layer(per_second: u64, burst_size: u32) -> PeerIpGovernorLayer {
    // `finish` only fails on zero values.
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(per_second)
        .burst_size(burst_size)
        .finish()
        .unwrap_or_else(GovernorConfig::default);

    GovernorLayer::new(Arc::new(governor_conf))
}
