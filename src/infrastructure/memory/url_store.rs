//! In-memory implementation of the URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{ArchivedUrl, ShortUrl, UrlUpdate};
use crate::domain::error::{RepositoryError, RepositoryResult};
use crate::domain::repositories::UrlStore;

/// [`UrlStore`] held in process memory.
///
/// DashMap provides sharded locking, so lookups for different short paths do
/// not contend. Delete holds the archive shard for the path while the live
/// row is removed, so no reader observes the row in both tables or neither.
#[derive(Debug, Default)]
pub struct MemoryUrlStore {
    live: DashMap<String, ShortUrl>,
    archive: DashMap<String, Vec<ArchivedUrl>>,
}

impl MemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live rows, expired ones included.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> RepositoryResult<Option<ShortUrl>> {
        Ok(self
            .live
            .iter()
            .filter(|entry| entry.original_url == original_url)
            .max_by_key(|entry| entry.created_at)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_short_path(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
    ) -> RepositoryResult<ShortUrl> {
        let record = self
            .live
            .get(short_path)
            .map(|entry| entry.value().clone())
            .ok_or(RepositoryError::NotFound)?;

        if record.is_expired(now) {
            return Err(RepositoryError::Expired);
        }
        Ok(record)
    }

    async fn insert(&self, record: &ShortUrl) -> RepositoryResult<()> {
        match self.live.entry(record.short_path.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "short path '{}' already exists",
                record.short_path
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn update(&self, update: &UrlUpdate) -> RepositoryResult<()> {
        let mut record = self
            .live
            .get_mut(&update.short_path)
            .ok_or(RepositoryError::NotFound)?;
        record.apply(update);
        Ok(())
    }

    async fn delete(
        &self,
        short_path: &str,
        now: DateTime<Utc>,
        deleted_by: &str,
    ) -> RepositoryResult<ArchivedUrl> {
        // Holds the archive shard; a vacant entry is only filled once the live row is gone.
        let archive = self.archive.entry(short_path.to_string());

        let (_, live) = self
            .live
            .remove(short_path)
            .ok_or(RepositoryError::NotFound)?;

        let archived = ArchivedUrl::from_live(live, now, deleted_by.to_string());
        archive.or_default().push(archived.clone());
        Ok(archived)
    }

    async fn find_archived(&self, short_path: &str) -> RepositoryResult<Vec<ArchivedUrl>> {
        Ok(self
            .archive
            .get(short_path)
            .map(|rows| rows.value().clone())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
