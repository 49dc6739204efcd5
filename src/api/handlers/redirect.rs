//! Handler for tracking-link redirects.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::warn;

use crate::application::services::RedirectOutcome;
use crate::domain::dedup::DedupGuard;
use crate::state::AppState;
use crate::utils::visitor_clock::VisitorClock;

/// Sends the visitor to the link's destination, counting the click once per
/// visitor-local day.
///
/// # Endpoint
///
/// `GET /r/{token}`
///
/// `token` is a link identifier or alias.
///
/// # Request Flow
///
/// 1. Determine the visitor's local date (`X-Timezone-Offset` header,
///    `tz_offset` cookie, then `DEFAULT_TZ_OFFSET_MINUTES`)
/// 2. Read `last_click_{id}` markers from the `Cookie` header
/// 3. Resolve, dedup, decide and record via [`crate::application::services::RedirectService`]
/// 4. Return `307 Temporary Redirect`
///
/// # Cookies
///
/// A new visit sets `last_click_{id}=YYYY-MM-DD`, expiring at the visitor's
/// next local midnight. Fallback redirects never set it.
///
/// # Errors
///
/// None reach the visitor. Unknown tokens, links without a destination and
/// store failures all redirect to `FALLBACK_URL`.
pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let clock = VisitorClock::from_headers(&headers, Utc::now(), state.default_tz_offset_minutes);
    let cookies = cookie_header(&headers);
    let mut guard = DedupGuard::from_cookie_header(cookies.as_deref());

    match state
        .redirect_service
        .dispatch(&token, &mut guard, clock.today())
        .await
    {
        RedirectOutcome::Destination { url, link_id, .. } => {
            let Ok(location) = HeaderValue::from_str(&url) else {
                warn!(link_id, "Destination is not a valid Location header");
                return fallback(&state);
            };

            let mut response = temporary_redirect(location);
            let max_age = clock.seconds_until_midnight();
            for marker in guard.issued() {
                if let Ok(cookie) = HeaderValue::from_str(&marker.to_set_cookie(max_age)) {
                    response.headers_mut().append(header::SET_COOKIE, cookie);
                }
            }
            response
        }
        RedirectOutcome::Fallback { .. } => fallback(&state),
    }
}

/// All `Cookie` headers joined into one, as HTTP/2 clients may split them.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let parts: Vec<&str> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    (!parts.is_empty()).then(|| parts.join("; "))
}

fn fallback(state: &AppState) -> Response {
    let location =
        HeaderValue::from_str(&state.fallback_url).unwrap_or(HeaderValue::from_static("/"));
    temporary_redirect(location)
}

fn temporary_redirect(location: HeaderValue) -> Response {
    (
        StatusCode::TEMPORARY_REDIRECT,
        [
            (header::LOCATION, location),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("last_click_x=2026-05-01"));

        assert_eq!(
            cookie_header(&headers).as_deref(),
            Some("a=1; last_click_x=2026-05-01")
        );
    }

    #[test]
    fn test_no_cookie_header() {
        assert_eq!(cookie_header(&HeaderMap::new()), None);
    }

    #[test]
    fn test_temporary_redirect_is_not_cacheable() {
        let response = temporary_redirect(HeaderValue::from_static("https://shop.example"));
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "https://shop.example");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }
}
