#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use link_tracker::infrastructure::cache::NullCache;
use link_tracker::state::{AppState, StateSettings};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

pub const ADMIN_TOKEN: &str = "test-admin-token-0123456789";
pub const FALLBACK_URL: &str = "/";

pub fn test_settings() -> StateSettings {
    StateSettings {
        admin_api_token: ADMIN_TOKEN.to_string(),
        cache_ttl_seconds: 60,
        store_timeout: Duration::from_secs(5),
        fallback_url: FALLBACK_URL.to_string(),
        default_tz_offset_minutes: 0,
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(Arc::new(pool), Arc::new(NullCache::new()), test_settings()).unwrap()
}

/// Today's date as seen by a visitor with offset 0.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Inserts a link with the default policy (2–8 %, 10/200).
pub async fn create_test_link(pool: &PgPool, id: &str, alias: Option<&str>, url: Option<&str>) {
    create_link_with_counters(pool, id, alias, url, 0, 0).await;
}

pub async fn create_link_with_counters(
    pool: &PgPool,
    id: &str,
    alias: Option<&str>,
    url: Option<&str>,
    clicks: i64,
    conversions: i64,
) {
    sqlx::query(
        "INSERT INTO links (id, name, alias, original_url, min_cr, max_cr, \
            target_conversions, target_clicks, clicks, conversions) \
         VALUES ($1, $1, $2, $3, 2, 8, 10, 200, $4, $5)",
    )
    .bind(id)
    .bind(alias)
    .bind(url)
    .bind(clicks)
    .bind(conversions)
    .execute(pool)
    .await
    .unwrap();
}

/// Inserts a row with no policy columns, as external tooling might.
pub async fn create_link_without_policy(pool: &PgPool, id: &str, url: &str) {
    sqlx::query("INSERT INTO links (id, original_url) VALUES ($1, $2)")
        .bind(id)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn link_counters(pool: &PgPool, id: &str) -> (i64, i64) {
    sqlx::query_as("SELECT clicks, conversions FROM links WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn daily_counters(pool: &PgPool, date: NaiveDate) -> Option<(i64, i64)> {
    sqlx::query_as("SELECT clicks, conversions FROM daily_stats WHERE date = $1")
        .bind(date)
        .fetch_optional(pool)
        .await
        .unwrap()
}
