//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_path}` - Redirect to the original URL
//! - `GET  /health`       - Health check: database, cache, background queue
//! - `/urls/*`            - Short URL management and statistics
//!
//! Static segments win over the `/{short_path}` capture, so `/health` and
//! `/urls` are never treated as short paths.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Requests exceeding the configured limit get 408
//! - **Path normalization** - Trailing slash handling

use std::time::Duration;

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState, request_timeout: Duration) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/{short_path}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api::routes::url_routes())
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
