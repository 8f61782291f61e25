//! Request logging middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

/// Logs one `http_request` event per request. Query strings are not logged.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        warn!(
            "event=http_request module=api status={} method={} path={} duration_ms={}",
            status.as_u16(),
            method,
            path,
            duration_ms
        );
    } else {
        info!(
            "event=http_request module=api status={} method={} path={} duration_ms={}",
            status.as_u16(),
            method,
            path,
            duration_ms
        );
    }

    response
}
