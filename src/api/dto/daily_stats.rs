//! DTOs for the daily rollup endpoint.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::DailyStat;
use crate::error::AppError;

/// Days covered when no range is given, today included.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Query for `GET /api/stats/daily`. Dates are `YYYY-MM-DD`, inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct DailyStatsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DailyStatsQuery {
    /// Fills missing bounds: `to` defaults to `today`, `from` to the start of
    /// the [`DEFAULT_RANGE_DAYS`]-day window ending at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the default window would start
    /// before the earliest representable date.
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
        let to = self.to.unwrap_or(today);
        let from = match self.from {
            Some(from) => from,
            None => TimeDelta::try_days(DEFAULT_RANGE_DAYS - 1)
                .and_then(|window| to.checked_sub_signed(window))
                .ok_or_else(|| {
                    AppError::bad_request(
                        "Date out of range",
                        json!({ "field": "to", "to": to.to_string() }),
                    )
                })?,
        };
        Ok((from, to))
    }
}

/// Rollups for a date range, oldest first.
#[derive(Debug, Serialize)]
pub struct DailyStatsResponse {
    pub from: String,
    pub to: String,
    pub items: Vec<DailyStat>,
}
