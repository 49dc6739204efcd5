//! DTO for the counter correction endpoint.

use serde::Deserialize;
use validator::Validate;

/// Request body for `POST /api/counters/adjust`.
///
/// Deltas are signed and unbounded; the caller keeps them consistent.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdjustCountersRequest {
    #[validate(length(min = 1, max = 64))]
    pub link_id: String,

    #[serde(default)]
    pub click_delta: i64,

    #[serde(default)]
    pub conversion_delta: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_deltas_default_to_zero() {
        let req: AdjustCountersRequest =
            serde_json::from_value(json!({ "linkId": "AbCdEfGhIjKl", "clickDelta": -3 }))
                .unwrap();
        assert_eq!(req.click_delta, -3);
        assert_eq!(req.conversion_delta, 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_link_id_rejected() {
        let req: AdjustCountersRequest =
            serde_json::from_value(json!({ "linkId": "", "clickDelta": 1 })).unwrap();
        assert!(req.validate().is_err());
    }
}
