//! Redis cache backend.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "url:";

fn key(alias: &str) -> String {
    format!("{KEY_PREFIX}{alias}")
}

fn connection_error(e: RedisError) -> CacheError {
    CacheError::ConnectionError(e.to_string())
}

/// Alias cache stored in Redis under `url:{alias}` with a TTL.
///
/// Failures after [`RedisCache::connect`] are logged and reported as a
/// miss or a successful write.
pub struct RedisCache {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisCache {
    /// Opens a managed connection and checks it with `PING`.
    ///
    /// `ttl_seconds` applies to writes that don't pass their own TTL.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(connection_error)?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(connection_error)?;
        conn.ping::<()>().await.map_err(connection_error)?;

        info!(ttl_seconds, "Redis cache ready");
        Ok(Self { conn, ttl_seconds })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, alias: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();

        let cached = conn
            .get::<_, Option<String>>(key(alias))
            .await
            .unwrap_or_else(|e| {
                warn!(alias, error = %e, "Redis lookup failed, treating as miss");
                None
            });

        debug!(alias, hit = cached.is_some(), "Redis lookup");
        Ok(cached)
    }

    async fn set_url(
        &self,
        alias: &str,
        long_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let ttl = ttl_seconds.unwrap_or(self.ttl_seconds);

        if let Err(e) = conn.set_ex::<_, _, ()>(key(alias), long_url, ttl).await {
            warn!(alias, error = %e, "Redis write failed");
        }
        Ok(())
    }

    async fn invalidate(&self, alias: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        match conn.del::<_, i64>(key(alias)).await {
            Ok(removed) => debug!(alias, removed, "Redis entry invalidated"),
            Err(e) => warn!(alias, error = %e, "Redis delete failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
