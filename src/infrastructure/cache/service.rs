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

/// Trait for caching alias → long URL mappings.
///
/// The cache is advisory: the link store stays authoritative. Implementations
/// must be thread-safe and fail open, so a broken cache degrades to store
/// lookups instead of failing requests.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache with TTL and capacity bound
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the long URL cached for an alias.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_url(&self, alias: &str) -> CacheResult<Option<String>>;

    /// Stores an alias mapping with optional TTL.
    ///
    /// `ttl_seconds = None` uses the implementation's default TTL.
    async fn set_url(&self, alias: &str, long_url: &str, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Removes a cached mapping. Used when a link is deleted.
    async fn invalidate(&self, alias: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Human-readable backend name for health reporting.
    fn backend_name(&self) -> &'static str;
}
