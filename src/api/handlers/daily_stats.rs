//! Handler for the daily rollup read-out.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::api::dto::daily_stats::{DailyStatsQuery, DailyStatsResponse};
use crate::domain::entities::daily_stat::day_key::FORMAT as DAY_FORMAT;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::visitor_clock::VisitorClock;

/// Lists per-day click and conversion totals.
///
/// # Endpoint
///
/// `GET /api/stats/daily?from=2026-05-01&to=2026-05-31`
///
/// Both bounds are inclusive. Without them the last 30 days, today
/// included, are returned; "today" uses `DEFAULT_TZ_OFFSET_MINUTES`.
/// Days without clicks are omitted.
///
/// # Errors
///
/// Returns 400 if `from` is after `to`, the range is wider than a year, or
/// the default window falls outside the calendar.
pub async fn daily_stats_handler(
    State(state): State<AppState>,
    Query(query): Query<DailyStatsQuery>,
) -> Result<Json<DailyStatsResponse>, AppError> {
    let today = VisitorClock::new(Utc::now(), state.default_tz_offset_minutes).today();
    let (from, to) = query.resolve(today)?;

    let items = state.counter_service.daily_stats(from, to).await?;

    Ok(Json(DailyStatsResponse {
        from: from.format(DAY_FORMAT).to_string(),
        to: to.format(DAY_FORMAT).to_string(),
        items,
    }))
}
