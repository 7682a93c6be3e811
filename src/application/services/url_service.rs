//! Short URL creation, resolution and maintenance service.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::background_task::BackgroundQueue;
use crate::domain::clock::Clock;
use crate::domain::code_generator::CodeGenerator;
use crate::domain::entities::{ArchivedUrl, ShortUrl, UrlUpdate};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::url_validator::validate_url;

/// Actor recorded in `created_by`, `modified_by` and `deleted_by`.
pub const SYSTEM_ACTOR: &str = "system";

/// Business rules on top of a [`UrlRepository`].
///
/// Validates input before any store access, reuses an existing mapping for
/// the same original URL, and records an access after every successful
/// resolution without waiting for it.
pub struct UrlService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    queue: BackgroundQueue,
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    pub fn new(
        repository: Arc<R>,
        generator: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
        queue: BackgroundQueue,
    ) -> Self {
        Self {
            repository,
            generator,
            clock,
            queue,
        }
    }

    /// Returns a short path for `original_url`, creating a mapping if needed.
    ///
    /// If an unexpired mapping for the same URL already exists its record is
    /// returned unchanged, even when `expiry` differs. Two concurrent calls
    /// for a new URL may both create a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - URL is empty, malformed, not http(s) or has no host
    /// - `expiry` is not in the future
    ///
    /// Returns [`AppError::Conflict`] if the generated short path is taken.
    pub async fn create_short_url(
        &self,
        original_url: &str,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<ShortUrl, AppError> {
        validate_url(original_url)?;
        let now = self.clock.now();
        ensure_future(expiry, now)?;

        if let Some(existing) = self.repository.find_existing(original_url).await? {
            debug!(short_path = %existing.short_path, "Reusing existing mapping");
            return Ok(existing);
        }

        let short_path = self.generator.generate()?;
        let record = ShortUrl::new(
            short_path,
            original_url.to_string(),
            expiry,
            now,
            SYSTEM_ACTOR.to_string(),
        );

        self.repository.create(&record).await?;

        info!(short_path = %record.short_path, "Short URL created");
        Ok(record)
    }

    /// Resolves a short path to its original URL and records the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the path is unknown or expired.
    pub async fn get_long_url(&self, short_path: &str) -> Result<String, AppError> {
        Ok(self.get_url_details(short_path).await?.original_url)
    }

    /// Returns the full record for a short path and records the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the path is unknown or expired.
    pub async fn get_url_details(&self, short_path: &str) -> Result<ShortUrl, AppError> {
        let record = self.repository.resolve(short_path).await?;
        self.queue.record_access(short_path, self.clock.now());
        Ok(record)
    }

    /// Replaces the original URL and expiry of a mapping.
    ///
    /// `expiry = None` clears any existing expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL or past expiry,
    /// [`AppError::NotFound`] if the path does not exist and
    /// [`AppError::Internal`] if the stale cache entry could not be removed.
    pub async fn update_short_url(
        &self,
        short_path: &str,
        original_url: &str,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        validate_url(original_url)?;
        let now = self.clock.now();
        ensure_future(expiry, now)?;

        let update = UrlUpdate {
            short_path: short_path.to_string(),
            original_url: original_url.to_string(),
            expiry,
            modified_at: now,
            modified_by: SYSTEM_ACTOR.to_string(),
        };

        self.repository.update(&update).await?;

        info!(short_path = %short_path, "Short URL updated");
        Ok(())
    }

    /// Archives and removes a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the path does not exist.
    pub async fn delete_url(&self, short_path: &str) -> Result<ArchivedUrl, AppError> {
        let archived = self
            .repository
            .remove(short_path, self.clock.now(), SYSTEM_ACTOR)
            .await?;

        info!(short_path = %short_path, "Short URL deleted");
        Ok(archived)
    }
}

fn ensure_future(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Result<(), AppError> {
    match expiry {
        Some(expiry) if expiry <= now => Err(AppError::bad_request(
            "Expiry must be in the future",
            json!({ "expiry": expiry, "now": now }),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::code_generator::MockCodeGenerator;
    use crate::domain::error::{CacheError, RepositoryError};
    use crate::domain::repositories::MockUrlRepository;
    use chrono::{Duration, TimeZone};
    use tokio::sync::mpsc;

    use crate::domain::background_task::BackgroundTask;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap()
    }

    fn record(path: &str, url: &str) -> ShortUrl {
        ShortUrl::new(
            path.to_string(),
            url.to_string(),
            None,
            now(),
            SYSTEM_ACTOR.to_string(),
        )
    }

    fn service(
        repository: MockUrlRepository,
        generator: MockCodeGenerator,
    ) -> (UrlService<MockUrlRepository>, mpsc::Receiver<BackgroundTask>) {
        let (queue, rx) = BackgroundQueue::new(16);
        let service = UrlService::new(
            Arc::new(repository),
            Arc::new(generator),
            Arc::new(ManualClock::new(now())),
            queue,
        );
        (service, rx)
    }

    #[tokio::test]
    async fn test_create_generates_and_stamps() {
        let mut repository = MockUrlRepository::new();
        repository
            .expect_find_existing()
            .withf(|url| url == "https://example.com/path")
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|record| {
                record.short_path == "gen12345"
                    && record.original_url == "https://example.com/path"
                    && record.created_at == now()
                    && record.created_by == SYSTEM_ACTOR
                    && record.modified_at.is_none()
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|| Ok("gen12345".to_string()));

        let (service, _rx) = service(repository, generator);

        let created = service
            .create_short_url("https://example.com/path", None)
            .await
            .unwrap();
        assert_eq!(created.short_path, "gen12345");
    }

    #[tokio::test]
    async fn test_create_reuses_existing_mapping() {
        let mut repository = MockUrlRepository::new();
        repository
            .expect_find_existing()
            .times(1)
            .returning(|url| Ok(Some(record("existing", url))));
        repository.expect_create().never();

        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().never();

        let (service, _rx) = service(repository, generator);

        let created = service
            .create_short_url("https://example.com", None)
            .await
            .unwrap();
        assert_eq!(created.short_path, "existing");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url_before_store() {
        let (service, _rx) = service(MockUrlRepository::new(), MockCodeGenerator::new());

        for input in ["", "not a url", "ftp://example.com"] {
            let err = service.create_short_url(input, None).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{}", input);
        }
    }

    #[tokio::test]
    async fn test_create_rejects_past_expiry() {
        let (service, _rx) = service(MockUrlRepository::new(), MockCodeGenerator::new());

        let err = service
            .create_short_url("https://example.com", Some(now() - Duration::minutes(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains("future"));
    }

    #[tokio::test]
    async fn test_create_surfaces_conflict() {
        let mut repository = MockUrlRepository::new();
        repository.expect_find_existing().returning(|_| Ok(None));
        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::Conflict("urls_pkey".into())));

        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .returning(|| Ok("dup".to_string()));

        let (service, _rx) = service(repository, generator);

        let err = service
            .create_short_url("https://example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_long_url_records_access() {
        let mut repository = MockUrlRepository::new();
        repository
            .expect_resolve()
            .withf(|path| path == "abc")
            .times(1)
            .returning(|path| Ok(record(path, "https://example.com")));

        let (service, mut rx) = service(repository, MockCodeGenerator::new());

        let url = service.get_long_url("abc").await.unwrap();
        assert_eq!(url, "https://example.com");

        match rx.try_recv().unwrap() {
            BackgroundTask::RecordAccess(entry) => {
                assert_eq!(entry.short_path, "abc");
                assert_eq!(entry.accessed_at, now());
            }
            other => panic!("unexpected task {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_absent_resolution_records_nothing() {
        let mut repository = MockUrlRepository::new();
        repository
            .expect_resolve()
            .times(2)
            .returning(|path| {
                if path == "old" {
                    Err(RepositoryError::Expired)
                } else {
                    Err(RepositoryError::NotFound)
                }
            });

        let (service, mut rx) = service(repository, MockCodeGenerator::new());

        for path in ["old", "missing"] {
            let err = service.get_url_details(path).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound { .. }));
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_builds_full_replace() {
        let mut repository = MockUrlRepository::new();
        let expiry = now() + Duration::days(1);
        repository
            .expect_update()
            .withf(move |update| {
                update.short_path == "abc"
                    && update.original_url == "https://new.example"
                    && update.expiry == Some(expiry)
                    && update.modified_at == now()
                    && update.modified_by == SYSTEM_ACTOR
            })
            .times(1)
            .returning(|_| Ok(()));

        let (service, _rx) = service(repository, MockCodeGenerator::new());

        service
            .update_short_url("abc", "https://new.example", Some(expiry))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_cache_failure_is_internal() {
        let mut repository = MockUrlRepository::new();
        repository
            .expect_update()
            .times(1)
            .returning(|_| Err(RepositoryError::Cache(CacheError::Connection("down".into()))));

        let (service, _rx) = service(repository, MockCodeGenerator::new());

        let err = service
            .update_short_url("abc", "https://new.example", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_update_validates_before_store() {
        let (service, _rx) = service(MockUrlRepository::new(), MockCodeGenerator::new());

        let err = service
            .update_short_url("abc", "mailto:x@example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_stamps_actor_and_time() {
        let mut repository = MockUrlRepository::new();
        repository
            .expect_remove()
            .withf(|path, at, by| path == "abc" && *at == now() && by == SYSTEM_ACTOR)
            .times(1)
            .returning(|path, at, by| {
                Ok(ArchivedUrl::from_live(
                    record(path, "https://example.com"),
                    at,
                    by.to_string(),
                ))
            });

        let (service, _rx) = service(repository, MockCodeGenerator::new());

        let archived = service.delete_url("abc").await.unwrap();
        assert_eq!(archived.deleted_at, now());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut repository = MockUrlRepository::new();
        repository
            .expect_remove()
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        let (service, _rx) = service(repository, MockCodeGenerator::new());

        assert!(matches!(
            service.delete_url("nope").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
