//! Adaptive conversion decision.
//!
//! Every countable click is also a candidate conversion. The decision is a
//! bounded feedback controller over the link's realized conversion rate:
//!
//! 1. Below the `min_cr` floor the click always converts (catch-up).
//! 2. Above the `max_cr` ceiling the click never converts (withhold).
//! 3. Inside `[min_cr, max_cr]` the click converts only if doing so keeps the
//!    link at or under its target ratio projected over `clicks + 1`.
//!
//! The inputs are a snapshot taken before the click is recorded. Under
//! concurrent load that snapshot may already be stale; the controller
//! corrects itself over subsequent clicks.

use serde::{Deserialize, Serialize};

/// Range a percentage bound must fall in.
pub const PERCENT_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

/// Default policy applied to newly created links.
pub const DEFAULT_MIN_CR: f64 = 2.0;
pub const DEFAULT_MAX_CR: f64 = 8.0;
pub const DEFAULT_TARGET_CONVERSIONS: i64 = 10;
pub const DEFAULT_TARGET_CLICKS: i64 = 200;

/// Configured bounds and target ratio for one link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionPolicy {
    pub min_cr: f64,
    pub max_cr: f64,
    pub target_conversions: i64,
    pub target_clicks: i64,
}

/// Why a policy was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },
    #[error("minCR ({min}) must not exceed maxCR ({max})")]
    InvertedBounds { min: f64, max: f64 },
    #[error("{field} must not be negative, got {value}")]
    NegativeTarget { field: &'static str, value: i64 },
}

impl ConversionPolicy {
    /// Builds a validated policy.
    ///
    /// `target_clicks = 0` is accepted: it is the degenerate case where the
    /// target ratio is zero, not a configuration error.
    pub fn new(
        min_cr: f64,
        max_cr: f64,
        target_conversions: i64,
        target_clicks: i64,
    ) -> Result<Self, PolicyError> {
        for (field, value) in [("minCR", min_cr), ("maxCR", max_cr)] {
            if !PERCENT_RANGE.contains(&value) {
                return Err(PolicyError::PercentOutOfRange { field, value });
            }
        }
        if min_cr > max_cr {
            return Err(PolicyError::InvertedBounds {
                min: min_cr,
                max: max_cr,
            });
        }
        for (field, value) in [
            ("targetConversions", target_conversions),
            ("targetClicks", target_clicks),
        ] {
            if value < 0 {
                return Err(PolicyError::NegativeTarget { field, value });
            }
        }

        Ok(Self {
            min_cr,
            max_cr,
            target_conversions,
            target_clicks,
        })
    }

    /// `target_conversions / target_clicks`, or `0` when no clicks are targeted.
    pub fn target_ratio(&self) -> f64 {
        if self.target_clicks > 0 {
            self.target_conversions as f64 / self.target_clicks as f64
        } else {
            0.0
        }
    }
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            min_cr: DEFAULT_MIN_CR,
            max_cr: DEFAULT_MAX_CR,
            target_conversions: DEFAULT_TARGET_CONVERSIONS,
            target_clicks: DEFAULT_TARGET_CLICKS,
        }
    }
}

/// Optional replacements for individual policy fields.
///
/// Applied on top of a base policy (the defaults on create, the stored
/// policy on update) and validated as a whole afterwards, so a patch that
/// only moves `max_cr` is still checked against the stored `min_cr`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolicyOverrides {
    pub min_cr: Option<f64>,
    pub max_cr: Option<f64>,
    pub target_conversions: Option<i64>,
    pub target_clicks: Option<i64>,
}

impl PolicyOverrides {
    pub fn is_empty(&self) -> bool {
        self.min_cr.is_none()
            && self.max_cr.is_none()
            && self.target_conversions.is_none()
            && self.target_clicks.is_none()
    }

    pub fn apply(&self, base: &ConversionPolicy) -> Result<ConversionPolicy, PolicyError> {
        ConversionPolicy::new(
            self.min_cr.unwrap_or(base.min_cr),
            self.max_cr.unwrap_or(base.max_cr),
            self.target_conversions.unwrap_or(base.target_conversions),
            self.target_clicks.unwrap_or(base.target_clicks),
        )
    }
}

/// Counter values observed before the current click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub clicks: i64,
    pub conversions: i64,
}

impl CounterSnapshot {
    pub fn new(clicks: i64, conversions: i64) -> Self {
        Self {
            clicks,
            conversions,
        }
    }

    /// Realized conversion rate in percent; `0` with no clicks.
    pub fn conversion_rate(&self) -> f64 {
        if self.clicks > 0 {
            self.conversions as f64 / self.clicks as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Decides whether the next click also counts as a conversion.
pub fn should_convert(snapshot: CounterSnapshot, policy: &ConversionPolicy) -> bool {
    let current_cr = snapshot.conversion_rate();

    if current_cr < policy.min_cr {
        return true;
    }
    if current_cr > policy.max_cr {
        return false;
    }

    let projected = (snapshot.clicks + 1) as f64 * policy.target_ratio();
    (snapshot.conversions as f64) < projected
}
