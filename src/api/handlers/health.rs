//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1` through the store
/// 2. **Cache**: backend ping (always ok when caching is disabled)
/// 3. **Background Queue**: channel open, reports pending tasks
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let cache = check_cache(&state).await;
    let background_queue = check_background_queue(&state);

    let all_healthy = database.is_ok() && cache.is_ok() && background_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            cache,
            background_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    if state.store.health_check().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Database did not respond")
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend();
    if state.cache.health_check().await {
        CheckStatus::ok(format!("Backend: {}", backend))
    } else {
        CheckStatus::error(format!("Backend {} unreachable", backend))
    }
}

fn check_background_queue(state: &AppState) -> CheckStatus {
    if state.background.is_closed() {
        CheckStatus::error("Background queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Pending: {}/{}",
            state.background.pending(),
            state.background.capacity()
        ))
    }
}
