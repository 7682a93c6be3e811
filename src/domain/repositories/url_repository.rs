//! Repository trait for cache-aware URL resolution.

use crate::domain::entities::{ArchivedUrl, ShortUrl, UrlUpdate};
use crate::domain::error::RepositoryResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Single entry point the services use for mappings.
///
/// Implementations compose a [`super::UrlStore`] with a cache and decide
/// which reads go where and how the cache is kept in step with writes.
///
/// # Implementations
///
/// - [`crate::infrastructure::resolver::ResolverRepository`]
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Resolves a short path to its live mapping.
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Expired` if the path does not resolve
    /// - `Store` if the cache could not answer and the store failed
    async fn resolve(&self, short_path: &str) -> RepositoryResult<ShortUrl>;

    /// Finds an unexpired mapping for an original URL, if one exists.
    async fn find_existing(&self, original_url: &str) -> RepositoryResult<Option<ShortUrl>>;

    /// Persists a new mapping without touching the cache.
    async fn create(&self, record: &ShortUrl) -> RepositoryResult<()>;

    /// Updates a mapping and invalidates its cache entry before returning.
    ///
    /// # Errors
    ///
    /// Returns `Cache` if the store write succeeded but the stale entry could
    /// not be removed; the caller must treat the update as failed.
    async fn update(&self, update: &UrlUpdate) -> RepositoryResult<()>;

    /// Archives and removes a mapping, then invalidates its cache entry.
    ///
    /// # Errors
    ///
    /// Same ordering and failure rule as [`UrlRepository::update`].
    async fn remove(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
        deleted_by: &str,
    ) -> RepositoryResult<ArchivedUrl>;
}
