//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`              - Welcome message (public)
//! - `GET  /health`        - Health check: DB, email queue, cache (public)
//! - `/api/auth/*`         - Registration, login and email token flows (public)
//! - `/api/users/*`        - Account endpoints (Bearer token required)
//! - `/api/contacts/*`     - Contact book (Bearer token required)
//! - `/avatars/*`          - Uploaded avatar files
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Origins from `CORS_ORIGINS`
//! - **Rate limiting** - Per-IP token bucket on `GET /api/users/me`
//! - **Authentication** - Bearer access token
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, root_handler};
use crate::api::middleware::rate_limit::{self, ClientIp};
use crate::api::middleware::{auth, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Room for multipart boundaries and headers on top of the avatar itself.
const MULTIPART_OVERHEAD: usize = 16 * 1024;

/// Constructs the application router with all routes and middleware.
///
/// When `config.behind_proxy` is set, rate limiting reads the client IP from
/// `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
/// enable only when the service runs behind a trusted reverse proxy.
pub fn app_router(state: AppState, config: &Config) -> NormalizePath<Router> {
    let router = build_router(
        state,
        config,
        Some(ClientIp::from_proxy_flag(config.behind_proxy)),
    );

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Routes and middleware without path normalization, rate limiter optional.
///
/// The limiter keys on the peer address, which only exists when the router is
/// served with `into_make_service_with_connect_info`; in-process test clients
/// pass `None`.
pub fn build_router(state: AppState, config: &Config, client_ip: Option<ClientIp>) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), auth::layer);

    let me_router = api::routes::me_routes().route_layer(auth_layer.clone());
    let me_router = match client_ip {
        Some(ClientIp::Peer) => me_router.layer(rate_limit::me_layer(PeerIpKeyExtractor)),
        Some(ClientIp::ProxyHeaders) => me_router.layer(rate_limit::me_layer(SmartIpKeyExtractor)),
        None => me_router,
    };

    let users_router = api::routes::users_routes()
        .route_layer(auth_layer.clone())
        .layer(DefaultBodyLimit::max(
            config.max_avatar_bytes + MULTIPART_OVERHEAD,
        ))
        .merge(me_router);

    let contacts_router = api::routes::contacts_routes().route_layer(auth_layer);

    let api_router = Router::new()
        .nest("/auth", api::routes::auth_routes())
        .nest("/users", users_router)
        .nest("/contacts", contacts_router);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest_service("/avatars", ServeDir::new(&config.avatar_dir))
        .with_state(state)
        .layer(cors_layer(&config.cors_origins))
        .layer(tracing::layer())
}

/// CORS for the configured origins; `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
