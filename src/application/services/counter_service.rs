//! Counter recording, correction and daily rollup read-out.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::info;

use crate::domain::entities::{CounterDelta, DailyStat, TrackingLink};
use crate::domain::repositories::CounterRepository;
use crate::error::AppError;

/// Widest date range a single rollup query may span, in days.
pub const MAX_DAILY_RANGE_DAYS: i64 = 366;

/// Service over the counter store.
pub struct CounterService<C: CounterRepository> {
    repository: Arc<C>,
}

impl<C: CounterRepository> CounterService<C> {
    /// Creates a new counter service.
    pub fn new(repository: Arc<C>) -> Self {
        Self { repository }
    }

    /// Records one countable click on the link and on the rollup for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link disappeared and store
    /// failures unchanged.
    pub async fn record_click(
        &self,
        link_id: &str,
        date: NaiveDate,
        converted: bool,
    ) -> Result<(), AppError> {
        self.repository
            .record_click(link_id, date, CounterDelta::click(converted))
            .await
    }

    /// Applies a signed correction to a link's counters.
    ///
    /// No bound checks are made: the caller keeps the deltas consistent.
    /// Daily rollups are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    pub async fn adjust(
        &self,
        link_id: &str,
        click_delta: i64,
        conversion_delta: i64,
    ) -> Result<TrackingLink, AppError> {
        let delta = CounterDelta::adjustment(click_delta, conversion_delta);
        let link = self.repository.adjust_link(link_id, delta).await?;

        info!(
            link_id,
            click_delta,
            conversion_delta,
            clicks = link.clicks,
            conversions = link.conversions,
            "Counters adjusted"
        );

        Ok(link)
    }

    /// Rollups with `from <= date <= to`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `from` is after `to` or the range
    /// exceeds [`MAX_DAILY_RANGE_DAYS`].
    pub async fn daily_stats(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyStat>, AppError> {
        if from > to {
            return Err(AppError::bad_request(
                "'from' must not be after 'to'",
                json!({ "from": from.to_string(), "to": to.to_string() }),
            ));
        }

        let span = (to - from).num_days() + 1;
        if span > MAX_DAILY_RANGE_DAYS {
            return Err(AppError::bad_request(
                format!("Date range must not exceed {MAX_DAILY_RANGE_DAYS} days"),
                json!({ "days": span }),
            ));
        }

        self.repository.list_daily(from, to).await
    }

    /// Rollup for one day, zeroed if nothing was recorded.
    pub async fn daily_stat(&self, date: NaiveDate) -> Result<DailyStat, AppError> {
        Ok(self
            .repository
            .daily_stat(date)
            .await?
            .unwrap_or(DailyStat {
                date,
                clicks: 0,
                conversions: 0,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversion::ConversionPolicy;
    use crate::domain::repositories::MockCounterRepository;
    use chrono::Utc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn link(clicks: i64, conversions: i64) -> TrackingLink {
        TrackingLink {
            id: "AbCdEfGhIjKl".to_string(),
            name: String::new(),
            alias: None,
            original_url: Some("https://shop.example".to_string()),
            affiliate_email: None,
            policy: ConversionPolicy::default(),
            clicks,
            conversions,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_record_click_sends_unit_delta() {
        let mut repo = MockCounterRepository::new();
        repo.expect_record_click()
            .withf(|id, day, delta| {
                id == "AbCdEfGhIjKl"
                    && *day == date(3)
                    && *delta == CounterDelta { clicks: 1, conversions: 1 }
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = CounterService::new(Arc::new(repo));

        assert!(service.record_click("AbCdEfGhIjKl", date(3), true).await.is_ok());
    }

    #[tokio::test]
    async fn test_record_click_without_conversion() {
        let mut repo = MockCounterRepository::new();
        repo.expect_record_click()
            .withf(|_, _, delta| *delta == CounterDelta { clicks: 1, conversions: 0 })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = CounterService::new(Arc::new(repo));

        assert!(service.record_click("AbCdEfGhIjKl", date(3), false).await.is_ok());
    }

    #[tokio::test]
    async fn test_adjust_allows_negative_deltas() {
        let mut repo = MockCounterRepository::new();
        repo.expect_adjust_link()
            .withf(|_, delta| *delta == CounterDelta { clicks: -5, conversions: -2 })
            .times(1)
            .returning(|_, _| Ok(link(95, 8)));

        let service = CounterService::new(Arc::new(repo));
        let updated = service.adjust("AbCdEfGhIjKl", -5, -2).await.unwrap();

        assert_eq!(updated.clicks, 95);
        assert_eq!(updated.conversions, 8);
    }

    #[tokio::test]
    async fn test_adjust_unknown_link() {
        let mut repo = MockCounterRepository::new();
        repo.expect_adjust_link()
            .returning(|id, _| Err(AppError::not_found("Link not found", json!({ "id": id }))));

        let service = CounterService::new(Arc::new(repo));

        let err = service.adjust("missing", 1, 0).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_daily_stats_rejects_inverted_range() {
        let mut repo = MockCounterRepository::new();
        repo.expect_list_daily().times(0);

        let service = CounterService::new(Arc::new(repo));

        let err = service.daily_stats(date(10), date(1)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_daily_stats_rejects_oversized_range() {
        let repo = MockCounterRepository::new();
        let service = CounterService::new(Arc::new(repo));

        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = service.daily_stats(from, date(1)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_daily_stats_single_day_range() {
        let mut repo = MockCounterRepository::new();
        repo.expect_list_daily()
            .withf(|from, to| from == to)
            .times(1)
            .returning(|from, _| {
                Ok(vec![DailyStat {
                    date: from,
                    clicks: 4,
                    conversions: 1,
                }])
            });

        let service = CounterService::new(Arc::new(repo));
        let stats = service.daily_stats(date(5), date(5)).await.unwrap();

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].clicks, 4);
    }

    #[tokio::test]
    async fn test_daily_stat_defaults_to_zero() {
        let mut repo = MockCounterRepository::new();
        repo.expect_daily_stat().returning(|_| Ok(None));

        let service = CounterService::new(Arc::new(repo));
        let stat = service.daily_stat(date(7)).await.unwrap();

        assert_eq!(stat.date, date(7));
        assert_eq!(stat.clicks, 0);
    }
}
