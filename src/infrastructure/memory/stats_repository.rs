//! In-memory implementation of the statistics repository.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::domain::entities::{AccessLogEntry, UrlStatistics};
use crate::domain::error::{RepositoryError, RepositoryResult};
use crate::domain::repositories::StatsRepository;

/// Access log held in process memory, keyed by short path.
#[derive(Debug, Default)]
pub struct MemoryStatsRepository {
    accesses: DashMap<String, Vec<DateTime<Utc>>>,
}

impl MemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows logged for a path, regardless of time.
    pub fn logged(&self, short_path: &str) -> usize {
        self.accesses.get(short_path).map_or(0, |rows| rows.len())
    }
}

#[async_trait]
impl StatsRepository for MemoryStatsRepository {
    async fn insert_access_log(&self, entry: &AccessLogEntry) -> RepositoryResult<()> {
        self.accesses
            .entry(entry.short_path.clone())
            .or_default()
            .push(entry.accessed_at);
        Ok(())
    }

    async fn get_statistics(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
    ) -> RepositoryResult<UrlStatistics> {
        let day_start = now - Duration::hours(24);
        let week_start = now - Duration::days(7);

        let (mut last_24_hours, mut past_week, mut all_time) = (0, 0, 0);
        if let Some(rows) = self.accesses.get(short_path) {
            for accessed_at in rows.iter().filter(|at| **at <= now) {
                all_time += 1;
                if *accessed_at > week_start {
                    past_week += 1;
                }
                if *accessed_at > day_start {
                    last_24_hours += 1;
                }
            }
        }

        if all_time == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(UrlStatistics {
            short_path: short_path.to_string(),
            last_24_hours,
            past_week,
            all_time,
        })
    }
}
