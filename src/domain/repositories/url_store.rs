//! Repository trait for the durable store of URL mappings.

use crate::domain::entities::{ArchivedUrl, ShortUrl, UrlUpdate};
use crate::domain::error::RepositoryResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable source of truth for live mappings and their archive.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryUrlStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_pg.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Finds the most recently created mapping for an original URL.
    ///
    /// Expired rows are returned as-is; the caller decides what to do with them.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`](crate::domain::error::RepositoryError::Store)
    /// on database errors.
    async fn find_by_original_url(&self, original_url: &str)
    -> RepositoryResult<Option<ShortUrl>>;

    /// Finds a live mapping by short path.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no row exists
    /// - `Expired` if the row's expiry lies before `now`
    /// - `Store` on database errors
    async fn find_by_short_path(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
    ) -> RepositoryResult<ShortUrl>;

    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the short path already exists, `Store` otherwise.
    async fn insert(&self, record: &ShortUrl) -> RepositoryResult<()>;

    /// Replaces the mutable fields of an existing mapping.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no row matched `update.short_path`.
    async fn update(&self, update: &UrlUpdate) -> RepositoryResult<()>;

    /// Moves a live mapping into the archive atomically.
    ///
    /// Reads the live row, writes an archive row stamped with `now` and
    /// `deleted_by`, then removes the live row. Nothing is changed unless all
    /// three steps succeed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no live row exists, `Store` on database errors.
    async fn delete(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
        deleted_by: &str,
    ) -> RepositoryResult<ArchivedUrl>;

    /// Lists archive rows for a short path, oldest deletion first.
    async fn find_archived(&self, short_path: &str) -> RepositoryResult<Vec<ArchivedUrl>>;

    /// Returns true if the store answers a trivial query.
    async fn health_check(&self) -> bool;
}
