//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::ShortUrl;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis cache of [`ShortUrl`] records stored as JSON under `url:{short_path}`.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// Errors are returned to the caller, which decides whether to fall back to the
/// durable store or fail the operation.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: Duration,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl` - TTL applied when [`CacheService::set`] is called with
    ///   `ttl = None`; controlled via `CACHE_TTL_SECONDS` env var
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl: Duration) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl,
            key_prefix: "url:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, short_path: &str) -> String {
        format!("{}{}", self.key_prefix, short_path)
    }
}

fn operation_error(op: &str, short_path: &str, e: redis::RedisError) -> CacheError {
    warn!(short_path = %short_path, error = %e, "Redis {} failed", op);
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_io_error() {
        CacheError::Connection(e.to_string())
    } else {
        CacheError::Operation(e.to_string())
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, short_path: &str) -> CacheResult<Option<ShortUrl>> {
        let key = self.build_key(short_path);
        let mut conn = self.client.clone();

        let raw = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| operation_error("GET", short_path, e))?;

        match raw {
            Some(json) => {
                let record = serde_json::from_str::<ShortUrl>(&json)
                    .map_err(|e| CacheError::Serialization(e.to_string()))?;
                debug!(short_path = %short_path, "Cache HIT");
                Ok(Some(record))
            }
            None => {
                debug!(short_path = %short_path, "Cache MISS");
                Ok(None)
            }
        }
    }

    async fn set(&self, record: &ShortUrl, ttl: Option<Duration>) -> CacheResult<()> {
        let key = self.build_key(&record.short_path);
        let mut conn = self.client.clone();
        // SET EX rejects zero
        let ttl_seconds = ttl.unwrap_or(self.default_ttl).as_secs().max(1);

        let json =
            serde_json::to_string(record).map_err(|e| CacheError::Serialization(e.to_string()))?;

        conn.set_ex::<_, _, ()>(&key, json, ttl_seconds)
            .await
            .map_err(|e| operation_error("SET", &record.short_path, e))?;

        debug!(short_path = %record.short_path, ttl_seconds, "Cache SET");
        Ok(())
    }

    async fn invalidate(&self, short_path: &str) -> CacheResult<()> {
        let key = self.build_key(short_path);
        let mut conn = self.client.clone();

        let deleted = conn
            .del::<_, i32>(&key)
            .await
            .map_err(|e| operation_error("DEL", short_path, e))?;

        if deleted > 0 {
            debug!(short_path = %short_path, "Cache INVALIDATE");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
