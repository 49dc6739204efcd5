//! DTOs for link administration endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::sync::LazyLock;
use validator::Validate;

use crate::api::dto::pagination::PaginationMeta;
use crate::application::services::{CreateLink, UpdateLink};
use crate::domain::conversion::PolicyOverrides;
use crate::domain::entities::{LinkFilter, TrackingLink};

/// Compiled regex for alias characters.
static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Request body for `POST /api/links`.
///
/// Policy fields left out take the defaults (`minCR` 2, `maxCR` 8,
/// `targetConversions` 10, `targetClicks` 200).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateLinkRequest {
    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 3, max = 64))]
    #[validate(regex(path = "*ALIAS_REGEX"))]
    pub alias: Option<String>,

    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,

    #[validate(email(message = "Invalid email address"))]
    pub affiliate_email: Option<String>,

    #[serde(rename = "minCR")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_cr: Option<f64>,

    #[serde(rename = "maxCR")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub max_cr: Option<f64>,

    #[validate(range(min = 0))]
    pub target_conversions: Option<i64>,

    #[validate(range(min = 0))]
    pub target_clicks: Option<i64>,
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(req: CreateLinkRequest) -> Self {
        Self {
            name: req.name,
            alias: req.alias,
            original_url: req.original_url,
            affiliate_email: req.affiliate_email,
            policy: PolicyOverrides {
                min_cr: req.min_cr,
                max_cr: req.max_cr,
                target_conversions: req.target_conversions,
                target_clicks: req.target_clicks,
            },
        }
    }
}

/// Request body for `PATCH /api/links/{id}`.
///
/// Only configuration fields are accepted; counters change through
/// `POST /api/counters/adjust` alone.
///
/// # Nullable fields
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear (`alias`, `affiliateEmail`)
/// - **Value** → set
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateLinkRequest {
    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(min = 3, max = 64))]
    #[validate(regex(path = "*ALIAS_REGEX"))]
    pub alias: Option<Option<String>>,

    #[validate(url(message = "Invalid URL format"))]
    pub original_url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(email(message = "Invalid email address"))]
    pub affiliate_email: Option<Option<String>>,

    #[serde(rename = "minCR")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_cr: Option<f64>,

    #[serde(rename = "maxCR")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub max_cr: Option<f64>,

    #[validate(range(min = 0))]
    pub target_conversions: Option<i64>,

    #[validate(range(min = 0))]
    pub target_clicks: Option<i64>,
}

impl From<UpdateLinkRequest> for UpdateLink {
    fn from(req: UpdateLinkRequest) -> Self {
        Self {
            name: req.name,
            alias: req.alias,
            original_url: req.original_url,
            affiliate_email: req.affiliate_email,
            policy: PolicyOverrides {
                min_cr: req.min_cr,
                max_cr: req.max_cr,
                target_conversions: req.target_conversions,
                target_clicks: req.target_clicks,
            },
        }
    }
}

/// JSON representation of a tracking link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_email: Option<String>,
    #[serde(rename = "minCR")]
    pub min_cr: f64,
    #[serde(rename = "maxCR")]
    pub max_cr: f64,
    pub target_conversions: i64,
    pub target_clicks: i64,
    pub clicks: i64,
    pub conversions: i64,
    /// Realized conversion rate in percent.
    pub conversion_rate: f64,
    pub created_at: DateTime<Utc>,
}

impl From<TrackingLink> for LinkResponse {
    fn from(link: TrackingLink) -> Self {
        let conversion_rate = link.conversion_rate();
        Self {
            id: link.id,
            name: link.name,
            alias: link.alias,
            original_url: link.original_url,
            affiliate_email: link.affiliate_email,
            min_cr: link.policy.min_cr,
            max_cr: link.policy.max_cr,
            target_conversions: link.policy.target_conversions,
            target_clicks: link.policy.target_clicks,
            clicks: link.clicks,
            conversions: link.conversions,
            conversion_rate,
            created_at: link.created_at,
        }
    }
}

/// Filter for `GET /api/links`, read alongside the pagination parameters.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkListQuery {
    /// Only links attributed to this affiliate, compared case-insensitively.
    #[validate(email(message = "Invalid email address"))]
    pub affiliate_email: Option<String>,
}

impl From<LinkListQuery> for LinkFilter {
    fn from(query: LinkListQuery) -> Self {
        Self {
            affiliate_email: query.affiliate_email,
        }
    }
}

/// Paginated list of links.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<LinkResponse>,
}
