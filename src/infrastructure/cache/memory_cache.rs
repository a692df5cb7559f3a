//! In-process cache implementation backed by moka.

use std::time::{Duration, Instant};

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

#[derive(Clone)]
struct CachedUrl {
    long_url: String,
    ttl: Duration,
}

/// Per-entry expiry so `set_url` can override the default TTL.
struct EntryTtl;

impl Expiry<String, CachedUrl> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedUrl,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedUrl,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded, TTL-evicting cache living inside the server process.
///
/// Suitable for single-instance deployments and tests; entries are not
/// shared between processes.
pub struct MemoryCache {
    inner: Cache<String, CachedUrl>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` mappings.
    pub fn new(max_entries: u64, default_ttl_seconds: u64) -> Self {
        debug!(max_entries, default_ttl_seconds, "Using MemoryCache");

        let inner = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryTtl)
            .build();

        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, alias: &str) -> CacheResult<Option<String>> {
        let hit = self.inner.get(alias).await.map(|entry| entry.long_url);
        if hit.is_some() {
            debug!(alias, "Cache HIT");
        } else {
            debug!(alias, "Cache MISS");
        }
        Ok(hit)
    }

    async fn set_url(
        &self,
        alias: &str,
        long_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl);

        self.inner
            .insert(
                alias.to_string(),
                CachedUrl {
                    long_url: long_url.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn invalidate(&self, alias: &str) -> CacheResult<()> {
        self.inner.invalidate(alias).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new(100, 60);

        cache
            .set_url("abc", "https://example.com", None)
            .await
            .unwrap();

        assert_eq!(
            cache.get_url("abc").await.unwrap(),
            Some("https://example.com".to_string())
        );
        assert_eq!(cache.get_url("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = MemoryCache::new(100, 60);
        cache
            .set_url("gone", "https://example.com", None)
            .await
            .unwrap();

        cache.invalidate("gone").await.unwrap();

        assert_eq!(cache.get_url("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new(100, 60);
        cache
            .set_url("short", "https://example.com", Some(1))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(cache.get_url("short").await.unwrap(), None);
    }
}
