//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /r/{token}` - Tracking-link redirect (public)
//! - `GET  /`          - Fallback landing page (public)
//! - `GET  /health`    - Health check: DB, cache (public)
//! - `/api/*`          - Admin API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the admin API
//! - **Authentication** - Bearer token on the admin API
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, index_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// The admin rate limiter keys on the peer address, so serve the result with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::admin_layer());

    let router = Router::new()
        .route("/r/{token}", get(redirect_handler))
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
