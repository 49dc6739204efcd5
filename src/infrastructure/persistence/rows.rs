//! Raw row shapes and their validation into domain entities.
//!
//! The `links` table is shared with external admin tooling, so policy columns
//! are nullable and nothing guarantees their ranges. Every row goes through
//! `TryFrom` here before it reaches a service.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::conversion::ConversionPolicy;
use crate::domain::entities::{Account, DailyStat, TrackingLink};
use crate::error::AppError;

/// Column list matching [`AccountRow`], in declaration order.
macro_rules! account_columns {
    () => {
        "uid, email, name, role, status, created_at, updated_at"
    };
}
pub(crate) use account_columns;

/// Column list matching [`LinkRow`], in declaration order.
macro_rules! link_columns {
    () => {
        "id, name, alias, original_url, affiliate_email, min_cr, max_cr, \
         target_conversions, target_clicks, clicks, conversions, created_at"
    };
}
pub(crate) use link_columns;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LinkRow {
    pub id: String,
    pub name: String,
    pub alias: Option<String>,
    pub original_url: Option<String>,
    pub affiliate_email: Option<String>,
    pub min_cr: Option<f64>,
    pub max_cr: Option<f64>,
    pub target_conversions: Option<i64>,
    pub target_clicks: Option<i64>,
    pub clicks: i64,
    pub conversions: i64,
    pub created_at: DateTime<Utc>,
}

fn required<T>(value: Option<T>, id: &str, field: &'static str) -> Result<T, AppError> {
    value.ok_or_else(|| {
        AppError::schema(
            "Link record is missing a required field",
            json!({ "id": id, "field": field }),
        )
    })
}

impl TryFrom<LinkRow> for TrackingLink {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let policy = ConversionPolicy::new(
            required(row.min_cr, &row.id, "minCR")?,
            required(row.max_cr, &row.id, "maxCR")?,
            required(row.target_conversions, &row.id, "targetConversions")?,
            required(row.target_clicks, &row.id, "targetClicks")?,
        )
        .map_err(|e| {
            AppError::schema(
                "Link record has an invalid conversion policy",
                json!({ "id": row.id, "reason": e.to_string() }),
            )
        })?;

        Ok(TrackingLink {
            id: row.id,
            name: row.name,
            alias: row.alias,
            original_url: row.original_url,
            affiliate_email: row.affiliate_email,
            policy,
            clicks: row.clicks,
            conversions: row.conversions,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DailyStatRow {
    pub date: NaiveDate,
    pub clicks: i64,
    pub conversions: i64,
}

impl From<DailyStatRow> for DailyStat {
    fn from(row: DailyStatRow) -> Self {
        DailyStat {
            date: row.date,
            clicks: row.clicks,
            conversions: row.conversions,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AccountRow {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(|reason: String| {
            AppError::schema(
                "Account record has an unknown role",
                json!({ "uid": row.uid, "reason": reason }),
            )
        })?;
        let status = row.status.parse().map_err(|reason: String| {
            AppError::schema(
                "Account record has an unknown status",
                json!({ "uid": row.uid, "reason": reason }),
            )
        })?;

        Ok(Account {
            uid: row.uid,
            email: row.email,
            name: row.name,
            role,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
