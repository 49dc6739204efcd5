//! Landing response for the default fallback route.

/// `GET /`
///
/// Visitors whose redirect could not be completed end up here unless
/// `FALLBACK_URL` points elsewhere.
pub async fn index_handler() -> &'static str {
    "This link is unavailable.\n"
}
