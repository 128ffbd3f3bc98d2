//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::KeyExtractor,
};

/// Where the client IP used as rate limit key comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIp {
    /// Socket peer address.
    Peer,
    /// `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, then the peer address.
    /// Only safe behind a trusted reverse proxy.
    ProxyHeaders,
}

impl ClientIp {
    pub fn from_proxy_flag(behind_proxy: bool) -> Self {
        if behind_proxy {
            ClientIp::ProxyHeaders
        } else {
            ClientIp::Peer
        }
    }
}

/// Limiter for `GET /api/users/me`.
///
/// # Limits
///
/// - **Rate**: 5 requests per minute (one token every 12 seconds)
/// - **Burst**: 5 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let me = Router::new()
///     .route("/me", get(me_handler))
///     .route_layer(rate_limit::me_layer(PeerIpKeyExtractor));
/// ```
pub fn me_layer<K: KeyExtractor>(
    extractor: K,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(extractor)
            .period(Duration::from_secs(12))
            .burst_size(5)
            .finish()
            .expect("rate limit period and burst size are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
