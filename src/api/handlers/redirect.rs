//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short path to its original URL.
///
/// # Endpoint
///
/// `GET /{short_path}`
///
/// # Request Flow
///
/// 1. Resolve through the cache, falling back to the store on miss
/// 2. Queue a cache warm-up on miss and an access record on success
/// 3. Return 307 Temporary Redirect
///
/// Neither background task delays the response; both are dropped when the
/// queue is full.
///
/// # Errors
///
/// Returns 404 Not Found if the path is unknown or expired.
pub async fn redirect_handler(
    Path(short_path): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.url_service.get_long_url(&short_path).await?;

    debug!(short_path = %short_path, "Redirecting");

    Ok(Redirect::temporary(&original_url))
}
