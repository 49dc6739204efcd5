//! Redirect dispatch: resolve, dedup, decide, record.
//!
//! The dispatcher never fails. Every resolver or store error is folded into
//! [`RedirectOutcome::Fallback`] and logged here, so the handler only has to
//! pick a `Location`.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, warn};

use crate::application::services::{CounterService, LinkService};
use crate::domain::conversion::should_convert;
use crate::domain::dedup::{DedupGuard, DedupOutcome};
use crate::domain::repositories::{CounterRepository, LinkRepository};
use crate::error::AppError;

/// Where a visitor ends up.
#[derive(Debug)]
pub enum RedirectOutcome {
    /// The link resolved and, for a new visit, its counters were updated.
    Destination {
        url: String,
        link_id: String,
        /// `None` for a duplicate visit, otherwise whether the click converted.
        counted: Option<bool>,
    },
    /// Something failed; send the visitor to the fallback route.
    Fallback { error: AppError },
}

/// Orchestrates one redirect under a single store deadline.
pub struct RedirectService<L: LinkRepository, C: CounterRepository> {
    links: Arc<LinkService<L>>,
    counters: Arc<CounterService<C>>,
    store_timeout: Duration,
}

impl<L, C> RedirectService<L, C>
where
    L: LinkRepository,
    C: CounterRepository + 'static,
{
    pub fn new(
        links: Arc<LinkService<L>>,
        counters: Arc<CounterService<C>>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            links,
            counters,
            store_timeout,
        }
    }

    /// Runs resolve → dedup → decide → record for `token`.
    ///
    /// `date` is the visitor's local calendar day; it keys both the dedup
    /// marker and the daily rollup. On a new visit `guard` gains a marker
    /// that the caller must hand back only for a destination outcome.
    pub async fn dispatch(
        &self,
        token: &str,
        guard: &mut DedupGuard,
        date: NaiveDate,
    ) -> RedirectOutcome {
        match self.run(token, guard, date).await {
            Ok(outcome) => outcome,
            Err(error) => {
                log_fallback(token, &error);
                RedirectOutcome::Fallback { error }
            }
        }
    }

    async fn run(
        &self,
        token: &str,
        guard: &mut DedupGuard,
        date: NaiveDate,
    ) -> Result<RedirectOutcome, AppError> {
        let deadline = Instant::now() + self.store_timeout;

        let resolved = timeout_at(deadline, self.links.resolve(token))
            .await
            .map_err(|_| self.timeout_error("resolve"))??;

        let link_id = resolved.link.id.clone();

        let counted = match guard.check(&link_id, date) {
            DedupOutcome::Duplicate => {
                debug!(link_id, %date, "Repeat visit, counters unchanged");
                None
            }
            DedupOutcome::New => {
                let converted = should_convert(resolved.link.snapshot(), &resolved.link.policy);

                // Detached: a dropped request or an expired deadline must not
                // abort a write already in flight.
                let counters = Arc::clone(&self.counters);
                let id = link_id.clone();
                let write =
                    tokio::spawn(async move { counters.record_click(&id, date, converted).await });

                match timeout_at(deadline, write).await {
                    Ok(Ok(result)) => result?,
                    Ok(Err(join_error)) => {
                        return Err(AppError::internal(
                            "Counter write task failed",
                            json!({ "reason": join_error.to_string() }),
                        ));
                    }
                    Err(_) => return Err(self.timeout_error("record")),
                }

                debug!(link_id, %date, converted, "Click recorded");
                Some(converted)
            }
        };

        Ok(RedirectOutcome::Destination {
            url: resolved.destination,
            link_id,
            counted,
        })
    }

    fn timeout_error(&self, stage: &str) -> AppError {
        AppError::timeout(
            "Store deadline exceeded",
            json!({
                "stage": stage,
                "timeout_ms": self.store_timeout.as_millis() as u64,
            }),
        )
    }
}

fn log_fallback(token: &str, error: &AppError) {
    match error {
        AppError::NotFound { .. } => debug!(token, "Unknown token, redirecting to fallback"),
        AppError::MissingDestination { .. } | AppError::Schema { .. } => {
            warn!(
                token,
                error = %error,
                details = %error.to_error_info().details,
                "Unusable link, redirecting to fallback"
            );
        }
        e if e.is_store_failure() => {
            error!(token, error = %e, "Store failure, redirecting to fallback");
        }
        e => error!(token, error = %e, "Redirect failed, redirecting to fallback"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversion::ConversionPolicy;
    use crate::domain::entities::{CounterDelta, DailyStat, TrackingLink};
    use crate::domain::repositories::{MockCounterRepository, MockLinkRepository};
    use crate::infrastructure::cache::NullCache;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn link(clicks: i64, conversions: i64) -> TrackingLink {
        TrackingLink {
            id: "AbCdEfGhIjKl".to_string(),
            name: String::new(),
            alias: Some("promo".to_string()),
            original_url: Some("https://shop.example/landing".to_string()),
            affiliate_email: None,
            policy: ConversionPolicy::new(2.0, 8.0, 10, 200).unwrap(),
            clicks,
            conversions,
            created_at: Utc::now(),
        }
    }

    fn links_returning(found: Option<TrackingLink>) -> LinkService<MockLinkRepository> {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(found.clone()));
        repo.expect_find_by_alias().returning(|_| Ok(None));
        LinkService::new(Arc::new(repo), Arc::new(NullCache::new()), 60)
    }

    fn dispatcher<C: CounterRepository + 'static>(
        links: LinkService<MockLinkRepository>,
        counters: C,
    ) -> RedirectService<MockLinkRepository, C> {
        RedirectService::new(
            Arc::new(links),
            Arc::new(CounterService::new(Arc::new(counters))),
            Duration::from_millis(3000),
        )
    }

    #[tokio::test]
    async fn test_new_visit_records_and_redirects() {
        let mut counters = MockCounterRepository::new();
        // CR 0 < minCR 2, so the first click converts.
        counters
            .expect_record_click()
            .withf(|id, day, delta| {
                id == "AbCdEfGhIjKl" && *day == today() && *delta == CounterDelta::click(true)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = dispatcher(links_returning(Some(link(0, 0))), counters);
        let mut guard = DedupGuard::default();

        let outcome = service.dispatch("AbCdEfGhIjKl", &mut guard, today()).await;

        match outcome {
            RedirectOutcome::Destination { url, counted, .. } => {
                assert_eq!(url, "https://shop.example/landing");
                assert_eq!(counted, Some(true));
            }
            other => panic!("expected destination, got {other:?}"),
        }
        assert_eq!(guard.issued().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_visit_skips_counters() {
        let mut counters = MockCounterRepository::new();
        counters.expect_record_click().times(0);

        let service = dispatcher(links_returning(Some(link(10, 1))), counters);
        let mut guard =
            DedupGuard::from_cookie_header(Some("last_click_AbCdEfGhIjKl=2026-06-01"));

        let outcome = service.dispatch("AbCdEfGhIjKl", &mut guard, today()).await;

        assert!(matches!(
            outcome,
            RedirectOutcome::Destination { counted: None, .. }
        ));
        assert!(guard.issued().is_empty());
    }

    #[tokio::test]
    async fn test_decision_uses_pre_increment_snapshot() {
        let mut counters = MockCounterRepository::new();
        // 20/100 = 20% > maxCR 8: withheld.
        counters
            .expect_record_click()
            .withf(|_, _, delta| *delta == CounterDelta::click(false))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = dispatcher(links_returning(Some(link(100, 20))), counters);
        let mut guard = DedupGuard::default();

        let outcome = service.dispatch("AbCdEfGhIjKl", &mut guard, today()).await;

        assert!(matches!(
            outcome,
            RedirectOutcome::Destination {
                counted: Some(false),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_token_falls_back_without_writes() {
        let mut counters = MockCounterRepository::new();
        counters.expect_record_click().times(0);

        let service = dispatcher(links_returning(None), counters);
        let mut guard = DedupGuard::default();

        let outcome = service.dispatch("nope", &mut guard, today()).await;

        assert!(matches!(
            outcome,
            RedirectOutcome::Fallback {
                error: AppError::NotFound { .. }
            }
        ));
        assert!(guard.issued().is_empty());
    }

    #[tokio::test]
    async fn test_missing_destination_falls_back_without_writes() {
        let mut counters = MockCounterRepository::new();
        counters.expect_record_click().times(0);

        let mut no_url = link(0, 0);
        no_url.original_url = None;
        let service = dispatcher(links_returning(Some(no_url)), counters);

        let outcome = service
            .dispatch("AbCdEfGhIjKl", &mut DedupGuard::default(), today())
            .await;

        assert!(matches!(
            outcome,
            RedirectOutcome::Fallback {
                error: AppError::MissingDestination { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_store_failure_falls_back() {
        let mut counters = MockCounterRepository::new();
        counters
            .expect_record_click()
            .returning(|_, _, _| Err(AppError::store_unavailable("down", json!({}))));

        let service = dispatcher(links_returning(Some(link(0, 0))), counters);

        let outcome = service
            .dispatch("AbCdEfGhIjKl", &mut DedupGuard::default(), today())
            .await;

        match outcome {
            RedirectOutcome::Fallback { error } => assert!(error.is_store_failure()),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    /// Counter store that takes longer than any sane deadline.
    struct SlowCounters {
        delay: Duration,
        writes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CounterRepository for SlowCounters {
        async fn record_click(
            &self,
            _link_id: &str,
            _date: NaiveDate,
            _delta: CounterDelta,
        ) -> Result<(), AppError> {
            tokio::time::sleep(self.delay).await;
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn adjust_link(
            &self,
            _link_id: &str,
            _delta: CounterDelta,
        ) -> Result<TrackingLink, AppError> {
            unimplemented!()
        }

        async fn daily_stat(&self, _date: NaiveDate) -> Result<Option<DailyStat>, AppError> {
            unimplemented!()
        }

        async fn list_daily(
            &self,
            _from: NaiveDate,
            _to: NaiveDate,
        ) -> Result<Vec<DailyStat>, AppError> {
            unimplemented!()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_and_write_survives() {
        let writes = Arc::new(AtomicUsize::new(0));
        let counters = SlowCounters {
            delay: Duration::from_secs(10),
            writes: Arc::clone(&writes),
        };
        let service = dispatcher(links_returning(Some(link(0, 0))), counters);

        let outcome = service
            .dispatch("AbCdEfGhIjKl", &mut DedupGuard::default(), today())
            .await;

        assert!(matches!(
            outcome,
            RedirectOutcome::Fallback {
                error: AppError::Timeout { .. }
            }
        ));
        assert_eq!(writes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }
}
