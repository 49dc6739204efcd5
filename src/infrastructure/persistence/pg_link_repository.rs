//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{LinkRow, link_columns};
use crate::domain::entities::{LinkFilter, LinkPatch, NewLink, TrackingLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for tracking link records.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<TrackingLink, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(concat!(
            "INSERT INTO links (id, name, alias, original_url, affiliate_email, \
             min_cr, max_cr, target_conversions, target_clicks) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING ",
            link_columns!()
        ))
        .bind(&new_link.id)
        .bind(&new_link.name)
        .bind(&new_link.alias)
        .bind(&new_link.original_url)
        .bind(&new_link.affiliate_email)
        .bind(new_link.policy.min_cr)
        .bind(new_link.policy.max_cr)
        .bind(new_link.policy.target_conversions)
        .bind(new_link.policy.target_clicks)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TrackingLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(concat!(
            "SELECT ",
            link_columns!(),
            " FROM links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(TrackingLink::try_from).transpose()
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<TrackingLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(concat!(
            "SELECT ",
            link_columns!(),
            " FROM links WHERE alias = $1"
        ))
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(TrackingLink::try_from).transpose()
    }

    async fn list(
        &self,
        filter: &LinkFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<TrackingLink>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(concat!(
            "SELECT ",
            link_columns!(),
            " FROM links WHERE ($1::text IS NULL OR affiliate_email = $1) \
             ORDER BY created_at DESC, id LIMIT $2 OFFSET $3"
        ))
        .bind(&filter.affiliate_email)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(TrackingLink::try_from).collect()
    }

    async fn count(&self, filter: &LinkFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM links WHERE ($1::text IS NULL OR affiliate_email = $1)",
        )
        .bind(&filter.affiliate_email)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn update(&self, id: &str, patch: LinkPatch) -> Result<TrackingLink, AppError> {
        let policy = patch.policy;

        let row = sqlx::query_as::<_, LinkRow>(concat!(
            "UPDATE links SET \
                name = COALESCE($2::text, name), \
                alias = CASE WHEN $3::boolean THEN $4::text ELSE alias END, \
                original_url = COALESCE($5::text, original_url), \
                affiliate_email = CASE WHEN $6::boolean THEN $7::text ELSE affiliate_email END, \
                min_cr = COALESCE($8::float8, min_cr), \
                max_cr = COALESCE($9::float8, max_cr), \
                target_conversions = COALESCE($10::int8, target_conversions), \
                target_clicks = COALESCE($11::int8, target_clicks) \
             WHERE id = $1 RETURNING ",
            link_columns!()
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.alias.is_some())
        .bind(patch.alias.flatten())
        .bind(patch.original_url)
        .bind(patch.affiliate_email.is_some())
        .bind(patch.affiliate_email.flatten())
        .bind(policy.map(|p| p.min_cr))
        .bind(policy.map(|p| p.max_cr))
        .bind(policy.map(|p| p.target_conversions))
        .bind(policy.map(|p| p.target_clicks))
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(TrackingLink::try_from)
            .transpose()?
            .ok_or_else(|| AppError::not_found("Tracking link not found", json!({ "id": id })))
    }

    async fn delete(&self, id: &str) -> Result<Option<TrackingLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(concat!(
            "DELETE FROM links WHERE id = $1 RETURNING ",
            link_columns!()
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(TrackingLink::try_from).transpose()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
