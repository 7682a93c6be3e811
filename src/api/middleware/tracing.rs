//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// # Logging Behavior
///
/// **On Request:**
/// - Creates a span at `INFO` level with method, URI and HTTP version
/// - Logs the start of processing at `DEBUG`
///
/// **On Response:**
/// - Logs at `INFO` level with status code and latency in milliseconds
///
/// **On Failure (5xx):**
/// - Logs at `ERROR` level with the failure class and latency
///
/// # Example Logs
///
/// ```text
/// DEBUG request{method=POST uri=/urls version=HTTP/1.1}: started processing request
/// INFO request{method=POST uri=/urls version=HTTP/1.1}: finished processing request latency=12 ms status=201
/// ```
///
/// # Integration
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(api::routes::url_routes())
///     .layer(tracing::layer());
/// ```
pub fn layer()
-> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
