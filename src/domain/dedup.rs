//! Once-per-visitor-per-day click deduplication.
//!
//! The marker lives on the visitor's side as a cookie named
//! `last_click_{link_id}` holding the visitor-local date of the last counted
//! click. It is advisory: a visitor who clears cookies is counted again.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::entities::daily_stat::day_key::FORMAT as DAY_FORMAT;

/// Cookie name prefix for dedup markers.
pub const MARKER_PREFIX: &str = "last_click_";

/// Path scope of marker cookies; covers every `/r/{token}` redirect.
pub const MARKER_PATH: &str = "/r";

/// Result of a dedup check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    /// First countable click for this link today.
    New,
    /// Already counted today; no statistics change.
    Duplicate,
}

/// A marker to hand back to the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupMarker {
    pub link_id: String,
    pub date: NaiveDate,
}

impl DedupMarker {
    pub fn cookie_name(&self) -> String {
        format!("{MARKER_PREFIX}{}", self.link_id)
    }

    /// `Set-Cookie` header value that expires after `max_age_seconds`.
    pub fn to_set_cookie(&self, max_age_seconds: i64) -> String {
        format!(
            "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite=Lax",
            self.cookie_name(),
            self.date.format(DAY_FORMAT),
            MARKER_PATH,
            max_age_seconds.max(1)
        )
    }
}

/// Reads the visitor's markers and records the ones to write back.
#[derive(Debug, Default)]
pub struct DedupGuard {
    markers: HashMap<String, NaiveDate>,
    issued: Vec<DedupMarker>,
}

impl DedupGuard {
    /// Parses markers out of a `Cookie` header.
    ///
    /// Unrelated cookies and markers with unparseable dates are ignored.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        let markers = header
            .into_iter()
            .flat_map(|raw| raw.split(';'))
            .filter_map(|cookie| {
                let (name, value) = cookie.trim().split_once('=')?;
                let link_id = name.strip_prefix(MARKER_PREFIX)?;
                let date = NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).ok()?;
                Some((link_id.to_string(), date))
            })
            .collect();

        Self {
            markers,
            issued: Vec::new(),
        }
    }

    /// Checks for a marker on `(link_id, date)`, creating it when absent.
    ///
    /// A marker carrying an earlier date belongs to a previous day and is
    /// treated as absent.
    pub fn check(&mut self, link_id: &str, date: NaiveDate) -> DedupOutcome {
        if self.markers.get(link_id) == Some(&date) {
            return DedupOutcome::Duplicate;
        }

        self.markers.insert(link_id.to_string(), date);
        self.issued.push(DedupMarker {
            link_id: link_id.to_string(),
            date,
        });
        DedupOutcome::New
    }

    /// Markers created during this request.
    pub fn issued(&self) -> &[DedupMarker] {
        &self.issued
    }
}
