use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use tracing::error;

use crate::domain::error::RepositoryError;
use crate::utils::url_validator::UrlValidationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::Internal { .. } => "internal_error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message, details) = match self {
            AppError::Validation { message, details } => {
                (StatusCode::BAD_REQUEST, message, details)
            }
            AppError::NotFound { message, details } => (StatusCode::NOT_FOUND, message, details),
            AppError::Conflict { message, details } => (StatusCode::CONFLICT, message, details),
            AppError::Internal { message, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, details)
            }
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound | RepositoryError::Expired => {
                AppError::not_found("Short URL not found", json!({}))
            }
            RepositoryError::Conflict(detail) => {
                AppError::conflict("Short path already exists", json!({ "detail": detail }))
            }
            RepositoryError::Store(detail) => {
                error!(error = %detail, "Store failure");
                AppError::internal("Internal server error", json!({}))
            }
            RepositoryError::Cache(e) => {
                error!(error = %e, "Cache failure");
                AppError::internal("Internal server error", json!({}))
            }
        }
    }
}

impl From<UrlValidationError> for AppError {
    fn from(err: UrlValidationError) -> Self {
        AppError::bad_request(err.to_string(), json!({ "field": "originalUrl" }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(errors.field_errors()).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid request", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::CacheError;

    #[test]
    fn test_absent_outcomes_map_to_not_found() {
        assert!(matches!(
            AppError::from(RepositoryError::NotFound),
            AppError::NotFound { .. }
        ));
        assert!(matches!(
            AppError::from(RepositoryError::Expired),
            AppError::NotFound { .. }
        ));
    }

    #[test]
    fn test_infrastructure_failures_are_opaque() {
        let store = AppError::from(RepositoryError::Store("connection reset".into()));
        let cache = AppError::from(RepositoryError::Cache(CacheError::Operation("DEL".into())));

        for err in [store, cache] {
            assert!(matches!(err, AppError::Internal { .. }));
            assert!(!err.to_string().contains("connection reset"));
            assert!(!err.to_string().contains("DEL"));
        }
    }

    #[test]
    fn test_conflict_is_preserved() {
        let err = AppError::from(RepositoryError::Conflict("urls_pkey".into()));
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[test]
    fn test_url_validation_maps_to_bad_request() {
        let err = AppError::from(UrlValidationError::UnsupportedScheme("ftp".into()));
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::bad_request("x", json!({})), StatusCode::BAD_REQUEST),
            (AppError::not_found("x", json!({})), StatusCode::NOT_FOUND),
            (AppError::conflict("x", json!({})), StatusCode::CONFLICT),
            (
                AppError::internal("x", json!({})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
