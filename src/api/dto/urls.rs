//! DTOs for short URL management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Request body for `POST /urls`.
///
/// # Example
///
/// ```json
/// {
///   "originalUrl": "https://example.com/very/long/path",
///   "expiry": "2030-01-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    #[validate(length(min = 1, max = 2048, message = "originalUrl must be 1-2048 characters"))]
    pub original_url: String,

    /// Absolute expiry; absent means the mapping never expires.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

/// Request body for `PUT /urls/{short_path}`.
///
/// Replaces both fields: an absent `expiry` clears the current one.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUrlRequest {
    #[validate(length(min = 1, max = 2048, message = "originalUrl must be 1-2048 characters"))]
    pub original_url: String,

    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

/// Response body for `POST /urls`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlResponse {
    pub original_url: String,
    pub short_path: String,
    pub short_url: String,
}

/// Snapshot of a mapping returned by `GET /urls/{short_path}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlDetailsResponse {
    pub short_path: String,
    pub short_url: String,
    pub original_url: String,
    pub expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl UrlDetailsResponse {
    pub fn from_record(record: ShortUrl, short_url: String) -> Self {
        Self {
            short_path: record.short_path,
            short_url,
            original_url: record.original_url,
            expiry: record.expiry,
            created_at: record.created_at,
            created_by: record.created_by,
            modified_at: record.modified_at,
            modified_by: record.modified_by,
        }
    }
}

/// Plain acknowledgement for update and delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_reads_camel_case() {
        let req: CreateUrlRequest = serde_json::from_value(json!({
            "originalUrl": "https://example.com",
            "expiry": "2030-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(req.original_url, "https://example.com");
        assert!(req.expiry.is_some());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_without_expiry() {
        let req: CreateUrlRequest =
            serde_json::from_value(json!({ "originalUrl": "https://example.com" })).unwrap();
        assert!(req.expiry.is_none());
    }

    #[test]
    fn test_empty_url_fails_validation() {
        let req = UpdateUrlRequest {
            original_url: String::new(),
            expiry: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_response_field_names() {
        let value = serde_json::to_value(CreateUrlResponse {
            original_url: "https://example.com".into(),
            short_path: "abc".into(),
            short_url: "http://s.test/abc".into(),
        })
        .unwrap();

        assert_eq!(value["originalUrl"], "https://example.com");
        assert_eq!(value["shortPath"], "abc");
        assert_eq!(value["shortUrl"], "http://s.test/abc");
    }
}
