//! API route configuration.

use crate::api::handlers::{
    create_url_handler, delete_url_handler, stats_handler, update_url_handler,
    url_details_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short URL management routes.
///
/// # Endpoints
///
/// - `POST   /urls`                    - Create (or reuse) a short URL
/// - `GET    /urls/{short_path}`       - Record snapshot
/// - `PUT    /urls/{short_path}`       - Replace target and expiry
/// - `DELETE /urls/{short_path}`       - Archive and delete
/// - `GET    /urls/{short_path}/stats` - Windowed access counts
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_url_handler))
        .route(
            "/urls/{short_path}",
            get(url_details_handler)
                .put(update_url_handler)
                .delete(delete_url_handler),
        )
        .route("/urls/{short_path}/stats", get(stats_handler))
}
