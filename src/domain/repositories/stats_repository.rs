//! Repository trait for access logging and statistics.

use crate::domain::entities::{AccessLogEntry, UrlStatistics};
use crate::domain::error::RepositoryResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Append-only access log plus windowed aggregate queries.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStatsRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Appends one access row.
    ///
    /// # Errors
    ///
    /// Returns `Store` on database errors.
    async fn insert_access_log(&self, entry: &AccessLogEntry) -> RepositoryResult<()>;

    /// Counts accesses in the last 24 hours, the last 7 days and all time,
    /// with every window ending at `now`.
    ///
    /// A path with no access rows at all is reported as `NotFound` rather
    /// than as zero counts, whether or not the mapping exists.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the all-time count is zero, `Store` on
    /// database errors.
    async fn get_statistics(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
    ) -> RepositoryResult<UrlStatistics>;
}
