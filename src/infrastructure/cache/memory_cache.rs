//! In-process cache backed by Moka.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::ShortUrl;
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct Entry {
    record: ShortUrl,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Cache of [`ShortUrl`] records held in this process.
///
/// Suitable for single-node deployments and for running the resolver without
/// Redis. Never fails: every operation returns `Ok`.
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64, default_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache, default_ttl }
    }

    /// Number of entries, including ones pending eviction.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, short_path: &str) -> CacheResult<Option<ShortUrl>> {
        match self.cache.get(short_path).await {
            Some(entry) => {
                debug!(short_path = %short_path, "Cache HIT");
                Ok(Some(entry.record))
            }
            None => {
                trace!(short_path = %short_path, "Cache MISS");
                Ok(None)
            }
        }
    }

    async fn set(&self, record: &ShortUrl, ttl: Option<Duration>) -> CacheResult<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.cache
            .insert(
                record.short_path.clone(),
                Entry {
                    record: record.clone(),
                    ttl,
                },
            )
            .await;
        debug!(short_path = %record.short_path, ttl_ms = ttl.as_millis() as u64, "Cache SET");
        Ok(())
    }

    async fn invalidate(&self, short_path: &str) -> CacheResult<()> {
        self.cache.invalidate(short_path).await;
        debug!(short_path = %short_path, "Cache INVALIDATE");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(path: &str, url: &str) -> ShortUrl {
        ShortUrl::new(
            path.to_string(),
            url.to_string(),
            None,
            Utc::now(),
            "system".to_string(),
        )
    }

    #[tokio::test]
    async fn test_get_and_set() {
        let cache = MemoryCache::new(100, Duration::from_secs(60));

        assert!(cache.get("abc").await.unwrap().is_none());

        cache.set(&record("abc", "https://example.com"), None).await.unwrap();

        let hit = cache.get("abc").await.unwrap().unwrap();
        assert_eq!(hit.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCache::new(100, Duration::from_secs(60));

        cache.set(&record("abc", "https://one.example"), None).await.unwrap();
        cache.set(&record("abc", "https://two.example"), None).await.unwrap();

        let hit = cache.get("abc").await.unwrap().unwrap();
        assert_eq!(hit.original_url, "https://two.example");
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let cache = MemoryCache::new(100, Duration::from_secs(60));

        cache.set(&record("abc", "https://example.com"), None).await.unwrap();
        cache.invalidate("abc").await.unwrap();
        cache.invalidate("abc").await.unwrap();

        assert!(cache.get("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_per_entry_ttl_expires() {
        let cache = MemoryCache::new(100, Duration::from_secs(60));

        cache
            .set(
                &record("short", "https://example.com"),
                Some(Duration::from_millis(50)),
            )
            .await
            .unwrap();
        cache.set(&record("long", "https://example.com"), None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get("short").await.unwrap().is_none());
        assert!(cache.get("long").await.unwrap().is_some());
    }
}
