//! Access statistics service.

use serde_json::json;
use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::entities::UrlStatistics;
use crate::domain::error::RepositoryError;
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Reads windowed access counts.
///
/// Recording is not done here: accesses are appended by the background
/// worker after a successful resolution.
pub struct StatsService<R: StatsRepository + ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: StatsRepository + ?Sized> StatsService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Counts accesses for the last 24 hours, the last 7 days and all time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the path has never been accessed.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_statistics(&self, short_path: &str) -> Result<UrlStatistics, AppError> {
        self.repository
            .get_statistics(short_path, self.clock.now())
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AppError::not_found(
                    "No statistics for this short path",
                    json!({ "shortPath": short_path }),
                ),
                other => other.into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::repositories::MockStatsRepository;
    use chrono::{TimeZone, Utc};

    fn service(repository: MockStatsRepository) -> StatsService<MockStatsRepository> {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap();
        StatsService::new(Arc::new(repository), Arc::new(ManualClock::new(now)))
    }

    #[tokio::test]
    async fn test_get_statistics_passes_clock_time() {
        let mut repository = MockStatsRepository::new();
        repository
            .expect_get_statistics()
            .withf(|path, now| {
                path == "abc123" && *now == Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap()
            })
            .times(1)
            .returning(|path, _| {
                Ok(UrlStatistics {
                    short_path: path.to_string(),
                    last_24_hours: 1,
                    past_week: 3,
                    all_time: 10,
                })
            });

        let stats = service(repository).get_statistics("abc123").await.unwrap();

        assert_eq!(stats.last_24_hours, 1);
        assert_eq!(stats.past_week, 3);
        assert_eq!(stats.all_time, 10);
    }

    #[tokio::test]
    async fn test_no_accesses_is_not_found() {
        let mut repository = MockStatsRepository::new();
        repository
            .expect_get_statistics()
            .times(1)
            .returning(|_, _| Err(RepositoryError::NotFound));

        let err = service(repository).get_statistics("never").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_store_error_is_internal() {
        let mut repository = MockStatsRepository::new();
        repository
            .expect_get_statistics()
            .times(1)
            .returning(|_, _| Err(RepositoryError::Store("timeout".into())));

        let err = service(repository).get_statistics("abc").await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
