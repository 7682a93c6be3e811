//! PostgreSQL implementation of the URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::debug;

use super::map_sqlx_error;
use crate::domain::entities::{ArchivedUrl, ShortUrl, UrlUpdate};
use crate::domain::error::{RepositoryError, RepositoryResult};
use crate::domain::repositories::UrlStore;

const URL_COLUMNS: &str =
    "short_path, original_url, expiry, created_at, created_by, modified_at, modified_by";

#[derive(FromRow)]
struct UrlRow {
    short_path: String,
    original_url: String,
    expiry: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: String,
    modified_at: Option<DateTime<Utc>>,
    modified_by: Option<String>,
}

impl From<UrlRow> for ShortUrl {
    fn from(row: UrlRow) -> Self {
        ShortUrl {
            short_path: row.short_path,
            original_url: row.original_url,
            expiry: row.expiry,
            created_at: row.created_at,
            created_by: row.created_by,
            modified_at: row.modified_at,
            modified_by: row.modified_by,
        }
    }
}

#[derive(FromRow)]
struct ArchivedRow {
    short_path: String,
    original_url: String,
    expiry: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: String,
    modified_at: Option<DateTime<Utc>>,
    modified_by: Option<String>,
    deleted_at: DateTime<Utc>,
    deleted_by: String,
}

impl From<ArchivedRow> for ArchivedUrl {
    fn from(row: ArchivedRow) -> Self {
        ArchivedUrl {
            short_path: row.short_path,
            original_url: row.original_url,
            expiry: row.expiry,
            created_at: row.created_at,
            created_by: row.created_by,
            modified_at: row.modified_at,
            modified_by: row.modified_by,
            deleted_at: row.deleted_at,
            deleted_by: row.deleted_by,
        }
    }
}

/// PostgreSQL store for live mappings (`urls`) and their archive (`urls_archive`).
pub struct PgUrlStore {
    pool: Arc<PgPool>,
}

impl PgUrlStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlStore for PgUrlStore {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> RepositoryResult<Option<ShortUrl>> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {URL_COLUMNS} FROM urls
             WHERE original_url = $1
             ORDER BY created_at DESC
             LIMIT 1"
        ))
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ShortUrl::from))
    }

    async fn find_by_short_path(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
    ) -> RepositoryResult<ShortUrl> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {URL_COLUMNS} FROM urls WHERE short_path = $1"
        ))
        .bind(short_path)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        let record = ShortUrl::from(row.ok_or(RepositoryError::NotFound)?);
        if record.is_expired(now) {
            debug!(short_path = %short_path, "Stored record has expired");
            return Err(RepositoryError::Expired);
        }
        Ok(record)
    }

    async fn insert(&self, record: &ShortUrl) -> RepositoryResult<()> {
        sqlx::query(
            "INSERT INTO urls
                (short_path, original_url, expiry, created_at, created_by, modified_at, modified_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&record.short_path)
        .bind(&record.original_url)
        .bind(record.expiry)
        .bind(record.created_at)
        .bind(&record.created_by)
        .bind(record.modified_at)
        .bind(record.modified_by.as_deref())
        .execute(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, update: &UrlUpdate) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE urls
             SET original_url = $2, expiry = $3, modified_at = $4, modified_by = $5
             WHERE short_path = $1",
        )
        .bind(&update.short_path)
        .bind(&update.original_url)
        .bind(update.expiry)
        .bind(update.modified_at)
        .bind(&update.modified_by)
        .execute(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
        deleted_by: &str,
    ) -> RepositoryResult<ArchivedUrl> {
        // Dropping `tx` without commit rolls back.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {URL_COLUMNS} FROM urls WHERE short_path = $1 FOR UPDATE"
        ))
        .bind(short_path)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let live = ShortUrl::from(row.ok_or(RepositoryError::NotFound)?);
        let archived = ArchivedUrl::from_live(live, now, deleted_by.to_string());

        sqlx::query(
            "INSERT INTO urls_archive
                (short_path, original_url, expiry, created_at, created_by,
                 modified_at, modified_by, deleted_at, deleted_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&archived.short_path)
        .bind(&archived.original_url)
        .bind(archived.expiry)
        .bind(archived.created_at)
        .bind(&archived.created_by)
        .bind(archived.modified_at)
        .bind(archived.modified_by.as_deref())
        .bind(archived.deleted_at)
        .bind(&archived.deleted_by)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM urls WHERE short_path = $1")
            .bind(short_path)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(short_path = %short_path, deleted_by = %deleted_by, "Archived and removed");
        Ok(archived)
    }

    async fn find_archived(&self, short_path: &str) -> RepositoryResult<Vec<ArchivedUrl>> {
        let rows = sqlx::query_as::<_, ArchivedRow>(&format!(
            "SELECT {URL_COLUMNS}, deleted_at, deleted_by FROM urls_archive
             WHERE short_path = $1
             ORDER BY deleted_at ASC, id ASC"
        ))
        .bind(short_path)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ArchivedUrl::from).collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
