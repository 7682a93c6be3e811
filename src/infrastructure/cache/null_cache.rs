//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::ShortUrl;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache implementation that stores nothing.
///
/// Every lookup is a miss, so every resolution goes to the durable store.
///
/// # Use Cases
///
/// - `CACHE_BACKEND=none`
/// - The admin CLI when Redis is not configured
/// - Tests that must observe store behaviour directly
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _short_path: &str) -> CacheResult<Option<ShortUrl>> {
        Ok(None)
    }

    async fn set(&self, _record: &ShortUrl, _ttl: Option<Duration>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _short_path: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}
