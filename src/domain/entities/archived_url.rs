//! Archived URL entity written when a mapping is deleted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ShortUrl;

/// Point-in-time copy of a deleted [`ShortUrl`] plus deletion metadata.
///
/// Created exactly once, inside the transaction that removes the live row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedUrl {
    pub short_path: String,
    pub original_url: String,
    pub expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
    pub deleted_at: DateTime<Utc>,
    pub deleted_by: String,
}

impl ArchivedUrl {
    /// Builds the archive entry from the live record read inside the delete.
    pub fn from_live(record: ShortUrl, deleted_at: DateTime<Utc>, deleted_by: String) -> Self {
        Self {
            short_path: record.short_path,
            original_url: record.original_url,
            expiry: record.expiry,
            created_at: record.created_at,
            created_by: record.created_by,
            modified_at: record.modified_at,
            modified_by: record.modified_by,
            deleted_at,
            deleted_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_from_live_copies_every_field() {
        let now = Utc::now();
        let mut live = ShortUrl::new(
            "gone01".to_string(),
            "https://example.com".to_string(),
            Some(now),
            now,
            "system".to_string(),
        );
        live.modified_at = Some(now);
        live.modified_by = Some("editor".to_string());

        let archived = ArchivedUrl::from_live(live.clone(), now, "admin".to_string());

        assert_eq!(archived.short_path, live.short_path);
        assert_eq!(archived.original_url, live.original_url);
        assert_eq!(archived.expiry, live.expiry);
        assert_eq!(archived.created_by, "system");
        assert_eq!(archived.modified_by.as_deref(), Some("editor"));
        assert_eq!(archived.deleted_at, now);
        assert_eq!(archived.deleted_by, "admin");
    }
}
