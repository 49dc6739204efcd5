//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    adjust_counters_handler, create_link_handler, daily_stats_handler, delete_link_handler,
    get_link_handler, list_links_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /links`           - List links (paginated)
/// - `POST   /links`           - Create a link
/// - `GET    /links/{id}`      - Fetch one link
/// - `PATCH  /links/{id}`      - Partially update a link's configuration
/// - `DELETE /links/{id}`      - Delete a link
/// - `POST   /counters/adjust` - Apply a signed counter correction
/// - `GET    /stats/daily`     - Daily click/conversion rollups
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .route("/counters/adjust", post(adjust_counters_handler))
        .route("/stats/daily", get(daily_stats_handler))
}
