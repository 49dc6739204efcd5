//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{AuthService, CounterService, LinkService, RedirectService};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::{PgCounterRepository, PgLinkRepository};

/// Settings the state is built from; a subset of [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub admin_api_token: String,
    pub cache_ttl_seconds: u64,
    pub store_timeout: Duration,
    pub fallback_url: String,
    pub default_tz_offset_minutes: i32,
}

/// Services and redirect settings shared across requests.
///
/// Cloning is cheap: every service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<PgLinkRepository>>,
    pub counter_service: Arc<CounterService<PgCounterRepository>>,
    pub redirect_service: Arc<RedirectService<PgLinkRepository, PgCounterRepository>>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
    pub fallback_url: Arc<str>,
    pub default_tz_offset_minutes: i32,
}

impl AppState {
    /// Wires repositories over `pool` into services.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the authentication key cannot be generated.
    pub fn new(
        pool: Arc<PgPool>,
        cache: Arc<dyn CacheService>,
        settings: StateSettings,
    ) -> Result<Self, AppError> {
        let link_repo = Arc::new(PgLinkRepository::new(pool.clone()));
        let counter_repo = Arc::new(PgCounterRepository::new(pool));

        let link_service = Arc::new(LinkService::new(
            link_repo,
            cache.clone(),
            settings.cache_ttl_seconds,
        ));
        let counter_service = Arc::new(CounterService::new(counter_repo));
        let redirect_service = Arc::new(RedirectService::new(
            link_service.clone(),
            counter_service.clone(),
            settings.store_timeout,
        ));
        let auth_service = Arc::new(AuthService::new(&settings.admin_api_token)?);

        Ok(Self {
            link_service,
            counter_service,
            redirect_service,
            auth_service,
            cache,
            fallback_url: Arc::from(settings.fallback_url),
            default_tz_offset_minutes: settings.default_tz_offset_minutes,
        })
    }
}
