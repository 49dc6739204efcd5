//! PostgreSQL implementation of counter repository.
//!
//! All counter writes are single-statement increments evaluated by the
//! database (`clicks = clicks + $n`), so concurrent writers serialize on the
//! row lock instead of overwriting each other.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{DailyStatRow, LinkRow, link_columns};
use crate::domain::entities::{CounterDelta, DailyStat, TrackingLink};
use crate::domain::repositories::CounterRepository;
use crate::error::AppError;

/// PostgreSQL repository for link counters and the daily rollup.
pub struct PgCounterRepository {
    pool: Arc<PgPool>,
}

impl PgCounterRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterRepository for PgCounterRepository {
    async fn record_click(
        &self,
        link_id: &str,
        date: NaiveDate,
        delta: CounterDelta,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE links SET clicks = clicks + $2, conversions = conversions + $3 WHERE id = $1",
        )
        .bind(link_id)
        .bind(delta.clicks)
        .bind(delta.conversions)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found(
                "Tracking link not found",
                json!({ "id": link_id }),
            ));
        }

        // Create-if-absent and increment in one statement; a concurrent first
        // writer for the same day lands in the conflict branch.
        sqlx::query(
            "INSERT INTO daily_stats (date, clicks, conversions) VALUES ($1, $2, $3) \
             ON CONFLICT (date) DO UPDATE SET \
                clicks = daily_stats.clicks + EXCLUDED.clicks, \
                conversions = daily_stats.conversions + EXCLUDED.conversions",
        )
        .bind(date)
        .bind(delta.clicks)
        .bind(delta.conversions)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn adjust_link(
        &self,
        link_id: &str,
        delta: CounterDelta,
    ) -> Result<TrackingLink, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(concat!(
            "UPDATE links SET clicks = clicks + $2, conversions = conversions + $3 \
             WHERE id = $1 RETURNING ",
            link_columns!()
        ))
        .bind(link_id)
        .bind(delta.clicks)
        .bind(delta.conversions)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(TrackingLink::try_from)
            .transpose()?
            .ok_or_else(|| AppError::not_found("Tracking link not found", json!({ "id": link_id })))
    }

    async fn daily_stat(&self, date: NaiveDate) -> Result<Option<DailyStat>, AppError> {
        let row = sqlx::query_as::<_, DailyStatRow>(
            "SELECT date, clicks, conversions FROM daily_stats WHERE date = $1",
        )
        .bind(date)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(DailyStat::from))
    }

    async fn list_daily(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyStat>, AppError> {
        let rows = sqlx::query_as::<_, DailyStatRow>(
            "SELECT date, clicks, conversions FROM daily_stats \
             WHERE date >= $1 AND date <= $2 ORDER BY date",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(DailyStat::from).collect())
    }
}
