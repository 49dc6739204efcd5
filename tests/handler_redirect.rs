mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use link_tracker::api::handlers::redirect_handler;
use link_tracker::utils::visitor_clock::VisitorClock;

fn make_server(pool: PgPool) -> TestServer {
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/r/{token}", get(redirect_handler))
        .with_state(state);
    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_first_visit_redirects_and_counts(pool: PgPool) {
    common::create_test_link(&pool, "link0001", None, Some("https://shop.example/a")).await;
    let server = make_server(pool.clone());
    let today = common::utc_today();

    let response = server
        .get("/r/link0001")
        .add_header("X-Timezone-Offset", "0")
        .await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://shop.example/a");
    assert_eq!(response.header("cache-control"), "no-store");

    let cookie = response.header("set-cookie");
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with(&format!("last_click_link0001={today};")));
    assert!(cookie.contains("Path=/r"));
    assert!(cookie.contains("HttpOnly"));

    // A fresh link is below its 2 % floor, so the first click converts.
    assert_eq!(common::link_counters(&pool, "link0001").await, (1, 1));
    assert_eq!(common::daily_counters(&pool, today).await, Some((1, 1)));
}

#[sqlx::test]
async fn test_repeat_visit_same_day_is_not_counted(pool: PgPool) {
    common::create_test_link(&pool, "link0002", None, Some("https://shop.example/b")).await;
    let server = make_server(pool.clone());
    let today = common::utc_today();

    let response = server
        .get("/r/link0002")
        .add_header("X-Timezone-Offset", "0")
        .add_header("Cookie", format!("last_click_link0002={today}"))
        .await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://shop.example/b");
    assert!(response.headers().get("set-cookie").is_none());
    assert_eq!(common::link_counters(&pool, "link0002").await, (0, 0));
    assert_eq!(common::daily_counters(&pool, today).await, None);
}

#[sqlx::test]
async fn test_marker_from_previous_day_counts_again(pool: PgPool) {
    common::create_test_link(&pool, "link0003", None, Some("https://shop.example/c")).await;
    let server = make_server(pool.clone());
    let yesterday = common::utc_today() - Duration::days(1);

    let response = server
        .get("/r/link0003")
        .add_header("X-Timezone-Offset", "0")
        .add_header("Cookie", format!("last_click_link0003={yesterday}"))
        .await;

    assert_eq!(response.status_code(), 307);
    assert!(response.headers().get("set-cookie").is_some());
    assert_eq!(common::link_counters(&pool, "link0003").await.0, 1);
}

#[sqlx::test]
async fn test_alias_resolves_to_same_link(pool: PgPool) {
    common::create_test_link(&pool, "link0004", Some("spring"), Some("https://shop.example/d"))
        .await;
    let server = make_server(pool.clone());

    let response = server.get("/r/spring").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://shop.example/d");
    let cookie = response.header("set-cookie");
    assert!(cookie.to_str().unwrap().starts_with("last_click_link0004="));
    assert_eq!(common::link_counters(&pool, "link0004").await.0, 1);
}

#[sqlx::test]
async fn test_above_ceiling_click_is_not_a_conversion(pool: PgPool) {
    // 10 % realized against an 8 % ceiling.
    common::create_link_with_counters(&pool, "link0005", None, Some("https://shop.example/e"), 100, 10)
        .await;
    let server = make_server(pool.clone());

    server.get("/r/link0005").await.assert_status(axum::http::StatusCode::TEMPORARY_REDIRECT);

    assert_eq!(common::link_counters(&pool, "link0005").await, (101, 10));
}

#[sqlx::test]
async fn test_unknown_token_falls_back(pool: PgPool) {
    let server = make_server(pool);

    let response = server.get("/r/nope").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), common::FALLBACK_URL);
    assert_eq!(response.header("cache-control"), "no-store");
    assert!(response.headers().get("set-cookie").is_none());
}

#[sqlx::test]
async fn test_missing_destination_falls_back_without_counting(pool: PgPool) {
    common::create_test_link(&pool, "link0006", None, None).await;
    let server = make_server(pool.clone());

    let response = server.get("/r/link0006").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), common::FALLBACK_URL);
    assert!(response.headers().get("set-cookie").is_none());
    assert_eq!(common::link_counters(&pool, "link0006").await, (0, 0));
}

#[sqlx::test]
async fn test_malformed_record_falls_back(pool: PgPool) {
    common::create_link_without_policy(&pool, "link0007", "https://shop.example/g").await;
    let server = make_server(pool.clone());

    let response = server.get("/r/link0007").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), common::FALLBACK_URL);
    assert_eq!(common::link_counters(&pool, "link0007").await, (0, 0));
}

/// Splits `last_click_<id>=<date>; ...; Max-Age=<n>; ...` into date and max-age.
fn marker_date_and_max_age(cookie: &str) -> (NaiveDate, i64) {
    let mut parts = cookie.split("; ");
    let date = parts
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.parse().unwrap())
        .unwrap();
    let max_age = parts
        .find_map(|attr| attr.strip_prefix("Max-Age="))
        .map(|value| value.parse().unwrap())
        .unwrap();
    (date, max_age)
}

#[sqlx::test]
async fn test_visitor_offset_selects_local_day(pool: PgPool) {
    common::create_test_link(&pool, "link0008", None, Some("https://shop.example/h")).await;
    common::create_test_link(&pool, "link0009", None, Some("https://shop.example/i")).await;
    let server = make_server(pool.clone());

    for (link, offset) in [("link0008", 840), ("link0009", -720)] {
        let clock = VisitorClock::new(Utc::now(), offset);
        let response = server
            .get(&format!("/r/{link}"))
            .add_header("X-Timezone-Offset", offset.to_string())
            .await;

        let cookie = response.header("set-cookie");
        let (date, max_age) = marker_date_and_max_age(cookie.to_str().unwrap());

        // Max-Age runs to the visitor's next local midnight.
        let expected_max_age = clock.seconds_until_midnight();
        assert!(
            (expected_max_age - max_age).rem_euclid(86_400) <= 5,
            "offset {offset}: Max-Age {max_age}, expected about {expected_max_age}"
        );
        if expected_max_age > 5 {
            assert_eq!(date, clock.today(), "offset {offset}");
        }
    }
}
