//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET     /                      - Service banner
//! GET     /health                - Liveness check
//!
//! # Address validation (checkout extension)
//! POST    /api/validate-address  - Validate a US address, return ZIP+4
//! OPTIONS /api/validate-address  - CORS preflight (204, no auth)
//! ```

pub mod validate_address;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// Path of the address validation endpoint.
pub const VALIDATE_ADDRESS_PATH: &str = "/api/validate-address";

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route(
        VALIDATE_ADDRESS_PATH,
        post(validate_address::validate_address)
            .options(validate_address::preflight)
            .fallback(validate_address::method_not_allowed),
    )
}

/// Build the complete application router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this stack.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .merge(api_routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .layer(cors_layer())
        .with_state(state)
}

/// Service banner.
async fn index() -> &'static str {
    "USPS Address Validation API is running."
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check USPS.
async fn health() -> &'static str {
    "ok"
}
