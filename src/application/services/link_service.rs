//! Link resolution and administration service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::domain::conversion::{ConversionPolicy, PolicyOverrides};
use crate::domain::entities::{LinkFilter, LinkPatch, NewLink, ResolvedLink, TrackingLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::identifiers::{generate_link_id, validate_alias};

/// Fields accepted when creating a link.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub original_url: String,
    pub affiliate_email: Option<String>,
    pub policy: PolicyOverrides,
}

/// Fields accepted when updating a link. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLink {
    pub name: Option<String>,
    pub alias: Option<Option<String>>,
    pub original_url: Option<String>,
    pub affiliate_email: Option<Option<String>>,
    pub policy: PolicyOverrides,
}

/// Resolves tokens to links and administers link records.
///
/// Identifiers and aliases share one token namespace: resolution tries the
/// identifier first, then the alias. Successful alias lookups are cached as
/// `alias → id`; the cache is advisory and every hit is re-checked against
/// the store.
pub struct LinkService<L: LinkRepository> {
    repository: Arc<L>,
    cache: Arc<dyn CacheService>,
    cache_ttl: u64,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    pub fn new(repository: Arc<L>, cache: Arc<dyn CacheService>, cache_ttl: u64) -> Self {
        Self {
            repository,
            cache,
            cache_ttl,
        }
    }

    /// Resolves a token to a link with a usable destination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if neither an identifier nor an alias
    /// matches and [`AppError::MissingDestination`] if the link has no
    /// destination URL. Store failures propagate unchanged.
    pub async fn resolve(&self, token: &str) -> Result<ResolvedLink, AppError> {
        let link = self.find(token).await?;

        let Some(destination) = link.destination().map(str::to_string) else {
            return Err(AppError::missing_destination(
                "Link has no destination URL",
                json!({ "link_id": link.id }),
            ));
        };

        Ok(ResolvedLink { link, destination })
    }

    /// Finds a link by identifier, then by alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if nothing matches.
    pub async fn find(&self, token: &str) -> Result<TrackingLink, AppError> {
        if let Some(link) = self.repository.find_by_id(token).await? {
            return Ok(link);
        }

        if let Some(link) = self.find_cached_alias(token).await? {
            return Ok(link);
        }

        match self.repository.find_by_alias(token).await? {
            Some(link) => {
                if let Err(e) = self
                    .cache
                    .set_link_id(token, &link.id, Some(self.cache_ttl))
                    .await
                {
                    warn!(alias = token, error = %e, "Failed to cache alias");
                }
                Ok(link)
            }
            None => Err(AppError::not_found(
                "Link not found",
                json!({ "token": token }),
            )),
        }
    }

    /// Follows a cached `alias → id` mapping, trusting it only if the record
    /// still carries that alias.
    async fn find_cached_alias(&self, alias: &str) -> Result<Option<TrackingLink>, AppError> {
        let cached_id = match self.cache.get_link_id(alias).await {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(alias, error = %e, "Alias cache unavailable");
                return Ok(None);
            }
        };

        match self.repository.find_by_id(&cached_id).await? {
            Some(link) if link.alias.as_deref() == Some(alias) => {
                debug!(alias, link_id = %link.id, "Alias resolved from cache");
                Ok(Some(link))
            }
            _ => {
                debug!(alias, cached_id, "Stale alias cache entry");
                self.invalidate_alias(alias).await;
                Ok(None)
            }
        }
    }

    /// Creates a link with zeroed counters.
    ///
    /// Unset policy fields take the defaults (`minCR` 2, `maxCR` 8,
    /// `targetConversions` 10, `targetClicks` 200).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a bad URL, alias or policy and
    /// [`AppError::Conflict`] if the alias is already a token.
    pub async fn create(&self, input: CreateLink) -> Result<TrackingLink, AppError> {
        let original_url = canonical_destination(&input.original_url)?;
        let policy = input.policy.apply(&ConversionPolicy::default())?;

        if let Some(alias) = &input.alias {
            validate_alias(alias)?;
            self.ensure_token_free(alias).await?;
        }

        let id = self.generate_unique_id().await?;

        let new_link = NewLink {
            id,
            name: input.name.unwrap_or_default(),
            alias: input.alias,
            original_url,
            affiliate_email: input.affiliate_email.as_deref().and_then(normalize_email),
            policy,
        };

        self.repository.create(new_link).await
    }

    /// Retrieves a link by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this identifier.
    pub async fn get(&self, id: &str) -> Result<TrackingLink, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Lists links matching `filter` newest first, together with the number
    /// of matching links.
    ///
    /// The affiliate email in `filter` is normalized the same way it is on
    /// write, so lookups are case-insensitive.
    pub async fn list(
        &self,
        filter: LinkFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<TrackingLink>, i64), AppError> {
        let filter = LinkFilter {
            affiliate_email: filter.affiliate_email.as_deref().and_then(normalize_email),
        };

        let links = self.repository.list(&filter, offset, limit).await?;
        let total = self.repository.count(&filter).await?;
        Ok((links, total))
    }

    /// Applies a configuration update. Counters are never touched.
    ///
    /// Policy fields are merged over the stored policy and the result is
    /// validated as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`], [`AppError::Validation`] or
    /// [`AppError::Conflict`].
    pub async fn update(&self, id: &str, input: UpdateLink) -> Result<TrackingLink, AppError> {
        let current = self.get(id).await?;

        let original_url = input
            .original_url
            .as_deref()
            .map(canonical_destination)
            .transpose()?;

        if let Some(Some(alias)) = &input.alias
            && current.alias.as_deref() != Some(alias.as_str())
        {
            validate_alias(alias)?;
            self.ensure_token_free(alias).await?;
        }

        let policy = if input.policy.is_empty() {
            None
        } else {
            Some(input.policy.apply(&current.policy)?)
        };

        let patch = LinkPatch {
            name: input.name,
            alias: input.alias,
            original_url,
            affiliate_email: input
                .affiliate_email
                .map(|email| email.as_deref().and_then(normalize_email)),
            policy,
        };

        let updated = self.repository.update(id, patch).await?;

        if let Some(old_alias) = &current.alias
            && updated.alias.as_deref() != Some(old_alias.as_str())
        {
            self.invalidate_alias(old_alias).await;
        }

        Ok(updated)
    }

    /// Deletes a link and drops its alias from the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this identifier.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        if let Some(alias) = &deleted.alias {
            self.invalidate_alias(alias).await;
        }

        Ok(())
    }

    /// Checks store reachability.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    async fn invalidate_alias(&self, alias: &str) {
        if let Err(e) = self.cache.invalidate(alias).await {
            warn!(alias, error = %e, "Failed to invalidate alias cache");
        }
    }

    /// Rejects an alias that is already an identifier or another link's alias.
    async fn ensure_token_free(&self, alias: &str) -> Result<(), AppError> {
        let taken = self.repository.find_by_id(alias).await?.is_some()
            || self.repository.find_by_alias(alias).await?.is_some();

        if taken {
            return Err(AppError::conflict(
                "Alias already in use",
                json!({ "alias": alias }),
            ));
        }
        Ok(())
    }

    /// Generates an identifier that collides with no existing token.
    ///
    /// Attempts up to 10 times before failing.
    async fn generate_unique_id(&self) -> Result<String, AppError> {
        const MAX_ATTEMPTS: usize = 10;

        for _ in 0..MAX_ATTEMPTS {
            let id = generate_link_id()?;

            if self.repository.find_by_id(&id).await?.is_none()
                && self.repository.find_by_alias(&id).await?.is_none()
            {
                return Ok(id);
            }
        }

        Err(AppError::internal(
            "Failed to generate unique identifier",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

/// Trims and lowercases an email; blank input counts as no email.
fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    (!email.is_empty()).then_some(email)
}

/// Accepts absolute `http`/`https` URLs only and returns the serialized
/// `Url`, which is always ASCII.
fn canonical_destination(raw: &str) -> Result<String, AppError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        AppError::bad_request(
            "Invalid destination URL",
            json!({ "field": "originalUrl", "reason": e.to_string() }),
        )
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::bad_request(
            "Destination URL must use http or https",
            json!({ "field": "originalUrl", "scheme": url.scheme() }),
        ));
    }

    Ok(url.to_string())
}
