// src/logging_middleware.rs
//! Middleware for logging requests and responses in debug mode
//!
//! OAuth callbacks carry a single-use code and the anti-forgery state in the
//! query string, so the query is redacted before it is logged.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::debug;

use crate::common::helpers::redact_query;

/// Middleware to log method, path, redacted query, status and latency
pub async fn log_request_response(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(redact_query).unwrap_or_default();

    debug!(
        method = %method,
        path = %path,
        query = %query,
        "📥 Request"
    );

    let started = Instant::now();
    let response = next.run(request).await;

    debug!(
        method = %method,
        path = %path,
        status = %response.status(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "📤 Response"
    );

    response
}
