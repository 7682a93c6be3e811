//! Short URL entity representing a live mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live mapping from a generated short path to an original URL.
///
/// `short_path` is the identity and never changes once assigned. The record
/// is logically absent once `expiry` has passed, even though the row stays
/// in the store until it is cleaned up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUrl {
    pub short_path: String,
    pub original_url: String,
    pub expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl ShortUrl {
    /// Creates a freshly minted record with no modification history.
    pub fn new(
        short_path: String,
        original_url: String,
        expiry: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        created_by: String,
    ) -> Self {
        Self {
            short_path,
            original_url,
            expiry,
            created_at,
            created_by,
            modified_at: None,
            modified_by: None,
        }
    }

    /// Returns true if `expiry` is set and lies strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry < now)
    }

    /// Applies a full replace of the mutable fields.
    pub fn apply(&mut self, update: &UrlUpdate) {
        self.original_url = update.original_url.clone();
        self.expiry = update.expiry;
        self.modified_at = Some(update.modified_at);
        self.modified_by = Some(update.modified_by.clone());
    }
}

/// Replacement values for the mutable fields of a [`ShortUrl`].
///
/// `expiry: None` clears the expiry; there is no "leave unchanged".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlUpdate {
    pub short_path: String,
    pub original_url: String,
    pub expiry: Option<DateTime<Utc>>,
    pub modified_at: DateTime<Utc>,
    pub modified_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_record_has_no_modification() {
        let record = ShortUrl::new(
            "abc123".to_string(),
            "https://example.com".to_string(),
            None,
            at(10),
            "system".to_string(),
        );

        assert_eq!(record.short_path, "abc123");
        assert!(record.modified_at.is_none());
        assert!(record.modified_by.is_none());
    }

    #[test]
    fn test_never_expires_without_expiry() {
        let record = ShortUrl::new(
            "p".to_string(),
            "https://example.com".to_string(),
            None,
            at(10),
            "system".to_string(),
        );

        assert!(!record.is_expired(at(23)));
    }

    #[test]
    fn test_is_expired_boundaries() {
        let record = ShortUrl::new(
            "p".to_string(),
            "https://example.com".to_string(),
            Some(at(12)),
            at(10),
            "system".to_string(),
        );

        assert!(!record.is_expired(at(11)));
        assert!(!record.is_expired(at(12)));
        assert!(record.is_expired(at(12) + Duration::seconds(1)));
    }

    #[test]
    fn test_apply_replaces_mutable_fields() {
        let mut record = ShortUrl::new(
            "p".to_string(),
            "https://old.example".to_string(),
            Some(at(12)),
            at(10),
            "system".to_string(),
        );

        record.apply(&UrlUpdate {
            short_path: "p".to_string(),
            original_url: "https://new.example".to_string(),
            expiry: None,
            modified_at: at(11),
            modified_by: "admin".to_string(),
        });

        assert_eq!(record.original_url, "https://new.example");
        assert!(record.expiry.is_none());
        assert_eq!(record.modified_at, Some(at(11)));
        assert_eq!(record.modified_by.as_deref(), Some("admin"));
        assert_eq!(record.created_at, at(10));
    }
}
