//! Counter deltas applied by the counter store.

/// Signed change to a link's `clicks` and `conversions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    pub clicks: i64,
    pub conversions: i64,
}

impl CounterDelta {
    /// Delta for one countable click.
    pub fn click(converted: bool) -> Self {
        Self {
            clicks: 1,
            conversions: i64::from(converted),
        }
    }

    /// Arbitrary correction, as applied by data recovery.
    pub fn adjustment(clicks: i64, conversions: i64) -> Self {
        Self {
            clicks,
            conversions,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.clicks == 0 && self.conversions == 0
    }
}
