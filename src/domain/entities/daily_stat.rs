//! Per-day counter rollup.

use chrono::NaiveDate;
use serde::Serialize;

/// Clicks and conversions recorded on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStat {
    #[serde(with = "day_key")]
    pub date: NaiveDate,
    pub clicks: i64,
    pub conversions: i64,
}

/// `YYYY-MM-DD` (de)serialization for calendar-day keys.
pub mod day_key {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_date_as_day_key() {
        let stat = DailyStat {
            date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
            clicks: 12,
            conversions: 1,
        };

        let json = serde_json::to_value(&stat).unwrap();
        assert_eq!(json["date"], "2026-03-07");
        assert_eq!(json["clicks"], 12);
        assert_eq!(json["conversions"], 1);
    }
}
