//! Handler for access statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns windowed access counts for a short path.
///
/// # Endpoint
///
/// `GET /urls/{short_path}/stats`
///
/// # Response
///
/// ```json
/// { "shortPath": "abc123", "last24Hours": 4, "pastWeek": 19, "allTime": 120 }
/// ```
///
/// Accesses are recorded asynchronously, so a redirect that just happened
/// may not be counted yet.
///
/// # Errors
///
/// Returns 404 Not Found if no access has ever been recorded for the path.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(short_path): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.get_statistics(&short_path).await?;
    Ok(Json(stats.into()))
}
