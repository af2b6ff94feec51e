//! End-to-end request timing.
//!
//! Outermost interceptor: the measured window covers validation, trace
//! context handling, the route handler, and envelope construction, so
//! the stamped latency is true end-to-end service time. Runs on every
//! exit path, success or failure.

use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use crate::observability::metrics;

/// Header carrying elapsed wall-clock milliseconds, 2 fraction digits.
pub const PROCESS_TIME_HEADER: &str = "x-process-time-ms";

/// Stamp `X-Process-Time-ms` on the response and record request metrics.
pub async fn stamp_process_time(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().as_str().to_string();

    let mut response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed_ms:.2}")) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(PROCESS_TIME_HEADER), value);
    }
    metrics::record_request(&method, response.status().as_u16(), start);

    response
}
