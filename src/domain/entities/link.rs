//! Tracking link entity.

use chrono::{DateTime, Utc};

use crate::domain::conversion::{ConversionPolicy, CounterSnapshot};

/// A tracking link with its conversion policy and running counters.
///
/// Counters are only ever changed through atomic increments at the store;
/// a `TrackingLink` value is a snapshot of the record at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingLink {
    pub id: String,
    pub name: String,
    pub alias: Option<String>,
    pub original_url: Option<String>,
    pub affiliate_email: Option<String>,
    pub policy: ConversionPolicy,
    pub clicks: i64,
    pub conversions: i64,
    pub created_at: DateTime<Utc>,
}

impl TrackingLink {
    /// Usable destination URL, if any.
    ///
    /// Blank strings and URLs containing control characters count as absent:
    /// neither can be sent as a `Location` header.
    pub fn destination(&self) -> Option<&str> {
        self.original_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && !url.chars().any(char::is_control))
    }

    /// Counter values as seen by the conversion decision.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot::new(self.clicks, self.conversions)
    }

    /// Realized conversion rate in percent.
    pub fn conversion_rate(&self) -> f64 {
        self.snapshot().conversion_rate()
    }
}

/// A link that resolved to a usable destination.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLink {
    pub link: TrackingLink,
    pub destination: String,
}

/// Input data for creating a new link. Counters always start at zero.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub id: String,
    pub name: String,
    pub alias: Option<String>,
    pub original_url: String,
    pub affiliate_email: Option<String>,
    pub policy: ConversionPolicy,
}

/// Partial update of a link's configuration.
///
/// `None` fields are left unchanged. `alias: Some(None)` clears the alias.
/// Counters are deliberately absent: they change only through increments.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub name: Option<String>,
    pub alias: Option<Option<String>>,
    pub original_url: Option<String>,
    pub affiliate_email: Option<Option<String>>,
    pub policy: Option<ConversionPolicy>,
}

/// Narrows a link listing. An empty filter matches every link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    /// Exact match on the normalized (trimmed, lowercase) affiliate email.
    pub affiliate_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(original_url: Option<&str>) -> TrackingLink {
        TrackingLink {
            id: "AbCdEfGhIjKl".to_string(),
            name: "Spring promo".to_string(),
            alias: Some("spring".to_string()),
            original_url: original_url.map(str::to_string),
            affiliate_email: None,
            policy: ConversionPolicy::default(),
            clicks: 50,
            conversions: 3,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_destination_present() {
        assert_eq!(
            link(Some("https://shop.example.com")).destination(),
            Some("https://shop.example.com")
        );
    }

    #[test]
    fn test_destination_blank_or_missing() {
        assert_eq!(link(None).destination(), None);
        assert_eq!(link(Some("   ")).destination(), None);
    }

    #[test]
    fn test_destination_with_control_characters_is_unusable() {
        assert_eq!(link(Some("https://a.example/\r\nSet-Cookie: x=1")).destination(), None);
    }

    #[test]
    fn test_snapshot_and_rate() {
        let l = link(Some("https://shop.example.com"));
        assert_eq!(l.snapshot(), CounterSnapshot::new(50, 3));
        assert_eq!(l.conversion_rate(), 6.0);
    }

    #[test]
    fn test_patch_default_changes_nothing() {
        let patch = LinkPatch::default();
        assert!(patch.name.is_none());
        assert!(patch.alias.is_none());
        assert!(patch.policy.is_none());
    }
}
