//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, LinkListQuery, LinkListResponse, LinkResponse, UpdateLinkRequest,
};
use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a tracking link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Spring campaign",
///   "alias": "spring",
///   "originalUrl": "https://shop.example/spring",
///   "minCR": 2,
///   "maxCR": 8
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails and 409 if the alias is taken.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&pageSize=25&affiliateEmail=aff@example.com`
///
/// `affiliateEmail` is optional and limits the listing, and its total, to
/// one affiliate's links.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<LinkListQuery>,
) -> Result<Json<LinkListResponse>, AppError> {
    filter.validate()?;
    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (links, total_items) = state
        .link_service
        .list(filter.into(), offset, limit)
        .await?;

    Ok(Json(LinkListResponse {
        pagination: PaginationMeta::new(params.page(), params.page_size(), total_items),
        items: links.into_iter().map(LinkResponse::from).collect(),
    }))
}

/// `GET /api/links/{id}`
pub async fn get_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get(&id).await?;
    Ok(Json(link.into()))
}

/// Partially updates a link's configuration.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// Absent fields are left unchanged; `"alias": null` clears the alias.
/// Counter fields are rejected; use `POST /api/counters/adjust`.
///
/// # Errors
///
/// Returns 404 if the link does not exist, 400 on validation failure and
/// 409 if the new alias is taken.
pub async fn update_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.update(&id, payload.into()).await?;

    Ok(Json(link.into()))
}

/// Deletes a link together with its counters.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Errors
///
/// Returns 404 if the link does not exist.
pub async fn delete_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
