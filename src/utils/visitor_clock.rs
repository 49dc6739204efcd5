//! Visitor-local calendar date.
//!
//! Dedup and daily rollups are keyed by the visitor's calendar day, not the
//! server's. The offset comes from the `X-Timezone-Offset` header, then the
//! `tz_offset` cookie, then the configured default.

use axum::http::{HeaderMap, header};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Request header carrying the visitor's offset in minutes east of UTC.
pub const TZ_OFFSET_HEADER: &str = "x-timezone-offset";

/// Cookie carrying the visitor's offset in minutes east of UTC.
pub const TZ_OFFSET_COOKIE: &str = "tz_offset";

/// Accepted offsets: UTC-12:00 through UTC+14:00.
pub const MIN_OFFSET_MINUTES: i32 = -720;
pub const MAX_OFFSET_MINUTES: i32 = 840;

/// A visitor's wall clock, fixed for the duration of one request.
#[derive(Debug, Clone, Copy)]
pub struct VisitorClock {
    offset_minutes: i32,
    now: DateTime<Utc>,
}

impl VisitorClock {
    /// Builds a clock for `offset_minutes` east of UTC at instant `now`.
    ///
    /// Out-of-range offsets are clamped.
    pub fn new(now: DateTime<Utc>, offset_minutes: i32) -> Self {
        Self {
            offset_minutes: offset_minutes.clamp(MIN_OFFSET_MINUTES, MAX_OFFSET_MINUTES),
            now,
        }
    }

    /// Resolves the visitor's offset from request headers.
    pub fn from_headers(headers: &HeaderMap, now: DateTime<Utc>, default_offset: i32) -> Self {
        Self::new(now, offset_from_headers(headers).unwrap_or(default_offset))
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    fn local_now(&self) -> NaiveDateTime {
        self.now.naive_utc() + Duration::minutes(i64::from(self.offset_minutes))
    }

    /// The visitor's current calendar date.
    pub fn today(&self) -> NaiveDate {
        self.local_now().date()
    }

    /// Seconds from now until the visitor's next local midnight, at least 1.
    pub fn seconds_until_midnight(&self) -> i64 {
        let local = self.local_now();
        let next_midnight = (local.date() + Duration::days(1)).and_time(NaiveTime::MIN);
        (next_midnight - local).num_seconds().max(1)
    }
}

fn parse_offset(raw: &str) -> Option<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|m| (MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(m))
}

/// Reads the offset from the header, falling back to the cookie.
///
/// Malformed or out-of-range values fall through to the next source.
pub fn offset_from_headers(headers: &HeaderMap) -> Option<i32> {
    let from_header = headers
        .get(TZ_OFFSET_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_offset);

    from_header.or_else(|| {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .filter_map(|cookie| cookie.trim().split_once('='))
            .find(|(name, _)| *name == TZ_OFFSET_COOKIE)
            .and_then(|(_, value)| parse_offset(value))
    })
}
