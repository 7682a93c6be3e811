//! Cache-aside resolution over the durable store.
//!
//! [`ResolverRepository`] is the only component that talks to both the cache
//! and the store. Its rules:
//!
//! - **Reads by short path** try the cache first. A miss, or a cache failure,
//!   falls through to the store; a store hit is written back to the cache
//!   asynchronously through the background queue.
//! - **Reads by original URL** go to the store only, since the cache is keyed
//!   by short path, and warm the cache on success.
//! - **Creates** go to the store only; the next read populates the cache.
//! - **Updates and removals** write the store first, then remove the cache
//!   entry before returning. If that removal fails the whole operation fails,
//!   because a surviving entry would keep serving the old value.
//! - **Warm-ups never outlive a write.** Reads snapshot the queue's
//!   [`CacheGenerations`](crate::domain::background_task::CacheGenerations)
//!   before touching the store and writes mark the path before removing the
//!   cache entry, so a warm-up queued before an update or removal is dropped
//!   by the worker.
//!
//! Cache entries carry the full record and never outlive its expiry: the
//! entry TTL is the configured default or the record's remaining lifetime,
//! whichever is shorter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::domain::background_task::BackgroundQueue;
use crate::domain::clock::Clock;
use crate::domain::entities::{ArchivedUrl, ShortUrl, UrlUpdate};
use crate::domain::error::{RepositoryError, RepositoryResult};
use crate::domain::repositories::{UrlRepository, UrlStore};
use crate::infrastructure::cache::CacheService;

pub struct ResolverRepository {
    store: Arc<dyn UrlStore>,
    cache: Arc<dyn CacheService>,
    clock: Arc<dyn Clock>,
    queue: BackgroundQueue,
    cache_ttl: Duration,
}

impl ResolverRepository {
    pub fn new(
        store: Arc<dyn UrlStore>,
        cache: Arc<dyn CacheService>,
        clock: Arc<dyn Clock>,
        queue: BackgroundQueue,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            clock,
            queue,
            cache_ttl,
        }
    }

    /// TTL for a cache entry holding `record`, or `None` if it should not be
    /// cached at all.
    fn entry_ttl(&self, record: &ShortUrl, now: DateTime<Utc>) -> Option<Duration> {
        match record.expiry {
            None => Some(self.cache_ttl),
            Some(expiry) => {
                let remaining = (expiry - now).to_std().ok()?;
                if remaining.is_zero() {
                    return None;
                }
                Some(remaining.min(self.cache_ttl))
            }
        }
    }

    fn warm(&self, record: ShortUrl, now: DateTime<Utc>, generation: u64) {
        match self.entry_ttl(&record, now) {
            Some(ttl) => {
                self.queue.warm_cache(record, ttl, generation);
            }
            None => debug!(short_path = %record.short_path, "Not caching record at expiry"),
        }
    }

    async fn invalidate(&self, short_path: &str) -> RepositoryResult<()> {
        self.queue.generations().invalidate(short_path);
        self.cache.invalidate(short_path).await.map_err(|e| {
            counter!("cache_errors_total", "backend" => self.cache.backend()).increment(1);
            error!(
                short_path = %short_path,
                error = %e,
                "Cache invalidation failed after store write"
            );
            RepositoryError::from(e)
        })
    }
}

#[async_trait]
impl UrlRepository for ResolverRepository {
    async fn resolve(&self, short_path: &str) -> RepositoryResult<ShortUrl> {
        let now = self.clock.now();
        let generation = self.queue.generations().snapshot();

        match self.cache.get(short_path).await {
            Ok(Some(record)) => {
                counter!("cache_hits_total").increment(1);
                if record.is_expired(now) {
                    debug!(short_path = %short_path, "Cached record has expired");
                    return Err(RepositoryError::Expired);
                }
                return Ok(record);
            }
            Ok(None) => {
                counter!("cache_misses_total").increment(1);
            }
            Err(e) => {
                counter!("cache_errors_total", "backend" => self.cache.backend()).increment(1);
                warn!(
                    short_path = %short_path,
                    error = %e,
                    "Cache lookup failed, falling back to store"
                );
            }
        }

        let record = self.store.find_by_short_path(short_path, now).await?;
        self.warm(record.clone(), now, generation);
        Ok(record)
    }

    async fn find_existing(&self, original_url: &str) -> RepositoryResult<Option<ShortUrl>> {
        let now = self.clock.now();
        let generation = self.queue.generations().snapshot();

        match self.store.find_by_original_url(original_url).await? {
            Some(record) if !record.is_expired(now) => {
                self.warm(record.clone(), now, generation);
                Ok(Some(record))
            }
            Some(record) => {
                debug!(short_path = %record.short_path, "Existing mapping has expired");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn create(&self, record: &ShortUrl) -> RepositoryResult<()> {
        self.store.insert(record).await
    }

    async fn update(&self, update: &UrlUpdate) -> RepositoryResult<()> {
        self.store.update(update).await?;
        self.invalidate(&update.short_path).await
    }

    async fn remove(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
        deleted_by: &str,
    ) -> RepositoryResult<ArchivedUrl> {
        let archived = self.store.delete(short_path, now, deleted_by).await?;
        self.invalidate(short_path).await?;
        Ok(archived)
    }
}
