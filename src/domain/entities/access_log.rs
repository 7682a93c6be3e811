//! Access log entry and derived statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One successful resolution of a short path. Append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLogEntry {
    pub short_path: String,
    pub accessed_at: DateTime<Utc>,
}

impl AccessLogEntry {
    pub fn new(short_path: impl Into<String>, accessed_at: DateTime<Utc>) -> Self {
        Self {
            short_path: short_path.into(),
            accessed_at,
        }
    }
}

/// Access counts for a short path over three windows ending at query time.
///
/// Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlStatistics {
    pub short_path: String,
    pub last_24_hours: i64,
    pub past_week: i64,
    pub all_time: i64,
}
