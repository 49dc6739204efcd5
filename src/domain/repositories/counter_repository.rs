//! Repository trait for atomic counter updates.

use crate::domain::entities::{CounterDelta, DailyStat, TrackingLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Applies counter changes with store-side atomic increments.
///
/// No method may read a counter, compute a new value and write it back:
/// concurrent clicks on the same link must never lose an increment.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCounterRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Records one countable click on a link and on the rollup for `date`.
    ///
    /// Both increments commit together or not at all. The daily row is
    /// created on first write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link no longer exists.
    async fn record_click(
        &self,
        link_id: &str,
        date: NaiveDate,
        delta: CounterDelta,
    ) -> Result<(), AppError>;

    /// Applies a signed correction to a link's counters and returns the
    /// updated record. No bound checks are made.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    async fn adjust_link(&self, link_id: &str, delta: CounterDelta)
    -> Result<TrackingLink, AppError>;

    /// Rollup for a single day, if any click was recorded.
    async fn daily_stat(&self, date: NaiveDate) -> Result<Option<DailyStat>, AppError>;

    /// Rollups with `from <= date <= to`, oldest first.
    async fn list_daily(&self, from: NaiveDate, to: NaiveDate)
    -> Result<Vec<DailyStat>, AppError>;
}
