//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of alias → link identifier mappings.
///
/// The cache only shortens alias resolution; it never holds counters or
/// destinations, so a stale entry can at worst cost one extra lookup.
/// Implementations must degrade to cache misses rather than fail requests.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the link identifier cached for `alias`.
    async fn get_link_id(&self, alias: &str) -> CacheResult<Option<String>>;

    /// Caches `alias → link_id`. `ttl_seconds = None` uses the implementation default.
    async fn set_link_id(
        &self,
        alias: &str,
        link_id: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Drops the mapping for `alias`, if any.
    async fn invalidate(&self, alias: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
