//! Link creation, resolution, listing and deletion service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{generate_alias, validate_custom_alias};

/// Attempts at inserting a random alias before giving up.
const MAX_ALIAS_ATTEMPTS: usize = 10;

/// Result of a creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new link was stored.
    Created(Link),
    /// The owner already shortened this exact long URL; nothing was stored.
    Existing(Link),
}

impl CreateOutcome {
    pub fn link(&self) -> &Link {
        match self {
            CreateOutcome::Created(link) | CreateOutcome::Existing(link) => link,
        }
    }
}

/// Service for the lifecycle of short links.
///
/// Owns the cache-aside policy: creation and store lookups write the
/// `alias -> long URL` mapping through, deletion invalidates it. Cache
/// failures are logged and never fail the request.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the prefix of every short URL, e.g.
    /// `https://sho.rt/api/short`.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            cache,
            base_url: base_url.into(),
        }
    }

    /// Builds the public short URL for an alias.
    pub fn short_url(&self, alias: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), alias)
    }

    /// Creates a short link for `owner_id`.
    ///
    /// # Flow
    ///
    /// 1. `long_url` and `topic` must be present and non-blank, and
    ///    `long_url` must parse as an absolute URL
    /// 2. A custom alias is validated and must not be taken
    /// 3. If the owner already shortened `long_url`, that link is returned
    /// 4. Otherwise the link is stored, with up to 10 random aliases tried
    ///    when no custom alias is given
    /// 5. The new mapping is written to the cache
    ///
    /// An empty custom alias counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for missing fields or a malformed alias.
    /// Returns [`AppError::Conflict`] if the custom alias is already in use.
    /// Returns [`AppError::Internal`] on storage errors or alias exhaustion.
    pub async fn create_short_link(
        &self,
        owner_id: &str,
        long_url: Option<String>,
        custom_alias: Option<String>,
        topic: Option<String>,
    ) -> Result<CreateOutcome, AppError> {
        let long_url = required(long_url, "longUrl")?;
        let topic = required(topic, "topic")?;
        if url::Url::parse(&long_url).is_err() {
            return Err(AppError::bad_request(
                "Long URL must be an absolute URL",
                json!({ "longUrl": long_url }),
            ));
        }
        let custom_alias = custom_alias.filter(|a| !a.is_empty());

        if let Some(alias) = &custom_alias {
            validate_custom_alias(alias)?;

            if self.link_repository.find_by_alias(alias).await?.is_some() {
                return Err(alias_taken(alias));
            }
        }

        if let Some(existing) = self
            .link_repository
            .find_by_owner_and_long_url(owner_id, &long_url)
            .await?
        {
            debug!(alias = %existing.alias, "Long URL already shortened by owner");
            return Ok(CreateOutcome::Existing(existing));
        }

        let link = match custom_alias {
            Some(alias) => {
                let new_link = NewLink {
                    owner_id: owner_id.to_string(),
                    alias: alias.clone(),
                    long_url,
                    topic,
                };

                match self.link_repository.create(new_link).await {
                    Err(AppError::Conflict { .. }) => return Err(alias_taken(&alias)),
                    other => other?,
                }
            }
            None => self.insert_with_random_alias(owner_id, long_url, topic).await?,
        };

        if let Err(e) = self.cache.set_url(&link.alias, &link.long_url, None).await {
            warn!(alias = %link.alias, error = %e, "Failed to warm cache");
        }

        Ok(CreateOutcome::Created(link))
    }

    async fn insert_with_random_alias(
        &self,
        owner_id: &str,
        long_url: String,
        topic: String,
    ) -> Result<Link, AppError> {
        for attempt in 1..=MAX_ALIAS_ATTEMPTS {
            let new_link = NewLink {
                owner_id: owner_id.to_string(),
                alias: generate_alias()?,
                long_url: long_url.clone(),
                topic: topic.clone(),
            };

            match self.link_repository.create(new_link).await {
                Err(AppError::Conflict { .. }) => {
                    debug!(attempt, "Generated alias collided, retrying");
                }
                other => return other,
            }
        }

        Err(AppError::internal(
            "Failed to generate unique alias",
            json!({ "attempts": MAX_ALIAS_ATTEMPTS }),
        ))
    }

    /// Resolves an alias to the long URL to redirect to.
    ///
    /// Reads the cache first; on a miss or cache failure falls back to the
    /// store and populates the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias does not exist.
    /// Returns [`AppError::Internal`] if the stored long URL is empty or not
    /// an absolute URL, or on storage errors.
    pub async fn resolve_alias(&self, alias: &str) -> Result<String, AppError> {
        let long_url = match self.cache.get_url(alias).await {
            Ok(Some(url)) => url,
            Ok(None) => self.load_and_cache(alias).await?,
            Err(e) => {
                warn!(alias, error = %e, "Cache lookup failed, falling back to store");
                self.load_and_cache(alias).await?
            }
        };

        if long_url.is_empty() || url::Url::parse(&long_url).is_err() {
            return Err(AppError::internal(
                "Long URL is not valid",
                json!({ "alias": alias }),
            ));
        }

        Ok(long_url)
    }

    async fn load_and_cache(&self, alias: &str) -> Result<String, AppError> {
        let link = self
            .link_repository
            .find_by_alias(alias)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "alias": alias })))?;

        if let Err(e) = self.cache.set_url(alias, &link.long_url, None).await {
            warn!(alias, error = %e, "Failed to cache URL");
        }

        Ok(link.long_url)
    }

    /// Lists the owner's links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner has no links.
    pub async fn list_user_links(&self, owner_id: &str) -> Result<Vec<Link>, AppError> {
        let links = self.link_repository.list_by_owner(owner_id).await?;

        if links.is_empty() {
            return Err(AppError::not_found("No URLs found for this user", json!({})));
        }

        Ok(links)
    }

    /// Finds a link by alias, visible only to its owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias is unknown or belongs to
    /// someone else.
    pub async fn get_owned_link(&self, owner_id: &str, alias: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_alias(alias)
            .await?
            .filter(|link| link.is_owned_by(owner_id))
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "alias": alias })))
    }

    /// Hard-deletes one of the owner's links and evicts its cache entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link with this id belongs to the
    /// owner.
    pub async fn delete_link(&self, owner_id: &str, id: i64) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .delete_for_owner(id, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "id": id })))?;

        if let Err(e) = self.cache.invalidate(&link.alias).await {
            warn!(alias = %link.alias, error = %e, "Failed to invalidate cache entry");
        }

        Ok(link)
    }

    /// Checks that the link store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.link_repository.health_check().await
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::bad_request(
            "Missing required fields: longUrl and topic are required",
            json!({ "field": field }),
        )),
    }
}

fn alias_taken(alias: &str) -> AppError {
    AppError::conflict(
        "Custom alias is already in use",
        json!({ "customAlias": alias }),
    )
}
