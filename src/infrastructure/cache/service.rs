//! Cache service trait and result type.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::ShortUrl;
pub use crate::domain::error::CacheError;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache of [`ShortUrl`] records keyed by short path.
///
/// The cache is disposable and can always be rebuilt from the durable store.
/// Implementations must keep "absent" and "broken" apart: a missing key is
/// `Ok(None)`, a transport or decoding failure is `Err`. Whether a failure is
/// swallowed is the caller's decision.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache with per-entry TTL
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached record for a short path.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` on cache hit
    /// - `Ok(None)` on cache miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend could not be reached or the
    /// stored value could not be decoded.
    async fn get(&self, short_path: &str) -> CacheResult<Option<ShortUrl>>;

    /// Stores a record, replacing any existing entry.
    ///
    /// `ttl = None` applies the implementation's default.
    async fn set(&self, record: &ShortUrl, ttl: Option<Duration>) -> CacheResult<()>;

    /// Removes the entry for a short path. Removing an absent key succeeds.
    async fn invalidate(&self, short_path: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;

    /// Backend name reported by health checks and startup logs.
    fn backend(&self) -> &'static str;
}
