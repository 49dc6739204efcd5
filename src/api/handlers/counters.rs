//! Handler for administrative counter correction.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::counters::AdjustCountersRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Applies signed deltas to a link's counters.
///
/// # Endpoint
///
/// `POST /api/counters/adjust`
///
/// ```json
/// { "linkId": "AbCdEfGhIjKl", "clickDelta": -3, "conversionDelta": -1 }
/// ```
///
/// Daily rollups are not changed.
///
/// # Errors
///
/// Returns 404 if the link does not exist.
pub async fn adjust_counters_handler(
    State(state): State<AppState>,
    Json(payload): Json<AdjustCountersRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state
        .counter_service
        .adjust(
            &payload.link_id,
            payload.click_delta,
            payload.conversion_delta,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
