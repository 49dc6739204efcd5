//! Repository trait for tracking link records.

use crate::domain::entities::{LinkFilter, LinkPatch, NewLink, TrackingLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store of tracking links, keyed by identifier with a secondary
/// unique alias.
///
/// Implementations validate every row they read and fail with
/// [`AppError::Schema`] instead of returning a partially valid record.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the identifier or alias is taken.
    async fn create(&self, new_link: NewLink) -> Result<TrackingLink, AppError>;

    /// Exact-match lookup by identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<TrackingLink>, AppError>;

    /// Exact-match lookup by alias.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<TrackingLink>, AppError>;

    /// Lists links matching `filter`, newest first.
    async fn list(
        &self,
        filter: &LinkFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<TrackingLink>, AppError>;

    /// Number of links matching `filter`.
    async fn count(&self, filter: &LinkFilter) -> Result<i64, AppError>;

    /// Applies a configuration patch. Counters are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this identifier and
    /// [`AppError::Conflict`] if the new alias is taken.
    async fn update(&self, id: &str, patch: LinkPatch) -> Result<TrackingLink, AppError>;

    /// Deletes a link, returning the removed record if it existed.
    async fn delete(&self, id: &str) -> Result<Option<TrackingLink>, AppError>;

    /// Round-trips to the store; used by health checks.
    async fn ping(&self) -> Result<(), AppError>;
}
