//! PostgreSQL implementation of the statistics repository.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::map_sqlx_error;
use crate::domain::entities::{AccessLogEntry, UrlStatistics};
use crate::domain::error::{RepositoryError, RepositoryResult};
use crate::domain::repositories::StatsRepository;

/// PostgreSQL repository for the `url_access_logs` table.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn insert_access_log(&self, entry: &AccessLogEntry) -> RepositoryResult<()> {
        sqlx::query("INSERT INTO url_access_logs (short_path, accessed_at) VALUES ($1, $2)")
            .bind(&entry.short_path)
            .bind(entry.accessed_at)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get_statistics(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
    ) -> RepositoryResult<UrlStatistics> {
        let (last_24_hours, past_week, all_time) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT
                COUNT(*) FILTER (WHERE accessed_at > $2),
                COUNT(*) FILTER (WHERE accessed_at > $3),
                COUNT(*)
             FROM url_access_logs
             WHERE short_path = $1 AND accessed_at <= $4",
        )
        .bind(short_path)
        .bind(now - Duration::hours(24))
        .bind(now - Duration::days(7))
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

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
