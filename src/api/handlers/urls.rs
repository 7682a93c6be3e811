//! Handlers for short URL management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::urls::{
    CreateUrlRequest, CreateUrlResponse, MessageResponse, UpdateUrlRequest, UrlDetailsResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL, or returns the existing one for the same target.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/page", "expiry": "2030-01-01T00:00:00Z" }
/// ```
///
/// # Response
///
/// **201 Created**
/// ```json
/// {
///   "originalUrl": "https://example.com/page",
///   "shortPath": "Zx81_qLmA0bc",
///   "shortUrl": "http://localhost:8080/Zx81_qLmA0bc"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request: empty or invalid URL, expiry in the past
/// - 409 Conflict: generated short path already taken
pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    payload.validate()?;

    let record = state
        .url_service
        .create_short_url(&payload.original_url, payload.expiry)
        .await?;

    let response = CreateUrlResponse {
        short_url: state.short_url(&record.short_path),
        original_url: record.original_url,
        short_path: record.short_path,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Returns the stored record for a short path.
///
/// # Endpoint
///
/// `GET /urls/{short_path}`
///
/// Counts as an access, like a redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the path is unknown or expired.
pub async fn url_details_handler(
    State(state): State<AppState>,
    Path(short_path): Path<String>,
) -> Result<Json<UrlDetailsResponse>, AppError> {
    let record = state.url_service.get_url_details(&short_path).await?;
    let short_url = state.short_url(&record.short_path);

    Ok(Json(UrlDetailsResponse::from_record(record, short_url)))
}

/// Replaces the target and expiry of a short path.
///
/// # Endpoint
///
/// `PUT /urls/{short_path}`
///
/// # Errors
///
/// - 400 Bad Request: empty or invalid URL, expiry in the past
/// - 404 Not Found: path does not exist
/// - 500 Internal Server Error: stale cache entry could not be removed
pub async fn update_url_handler(
    State(state): State<AppState>,
    Path(short_path): Path<String>,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state
        .url_service
        .update_short_url(&short_path, &payload.original_url, payload.expiry)
        .await?;

    Ok(Json(MessageResponse::new("URL updated")))
}

/// Archives and deletes a short path.
///
/// # Endpoint
///
/// `DELETE /urls/{short_path}`
///
/// # Errors
///
/// - 404 Not Found: path does not exist
/// - 500 Internal Server Error: stale cache entry could not be removed
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(short_path): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.url_service.delete_url(&short_path).await?;

    Ok(Json(MessageResponse::new("URL deleted")))
}
