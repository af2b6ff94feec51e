//! Trace context injection and the last-resort failure chokepoint.
//!
//! Opens the request-level span, makes the `TraceContext` available to
//! handlers through request extensions, and finalizes the span when the
//! response leaves. A panic escaping the inner pipeline is caught here,
//! where the active trace id is known, and fed through
//! `ApiError::Internal` so the caller still receives the uniform
//! envelope and exactly one `unhandled_exception` record is emitted.
//!
//! Probe routes get no span: health checks are high-frequency and would
//! drown real traffic in the trace sink.

use std::panic::AssertUnwindSafe;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;

use crate::http::error::{panic_detail, ApiError};
use crate::observability::{SpanStatus, TraceContext, Tracer};

/// Routes excluded from spans and structured events.
const PROBE_PATHS: [&str; 3] = ["/health", "/live_check", "/ready_check"];

/// Wrap one request in a span and propagate its `TraceContext`.
///
/// An inbound W3C `traceparent` header continues the caller's trace;
/// otherwise a fresh root context is minted.
pub async fn inject_trace_context(
    State(tracer): State<Tracer>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if PROBE_PATHS.contains(&path.as_str()) {
        // No span, but an escaped panic still gets mapped; the minted
        // trace id only exists to key the log record.
        return match AssertUnwindSafe(next.run(request)).catch_unwind().await {
            Ok(response) => response,
            Err(panic) => ApiError::Internal {
                detail: panic_detail(panic),
                trace_id: TraceContext::new_root().trace_id_hex(),
                path,
            }
            .into_response(),
        };
    }

    let ctx = request
        .headers()
        .get("traceparent")
        .and_then(|value| value.to_str().ok())
        .and_then(TraceContext::from_traceparent)
        .unwrap_or_else(TraceContext::new_root);

    let span = tracer.span_with_context("http_request", ctx);
    request.extensions_mut().insert(ctx);

    let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => ApiError::Internal {
            detail: panic_detail(panic),
            trace_id: ctx.trace_id_hex(),
            path,
        }
        .into_response(),
    };

    let status = if response.status().is_server_error() {
        SpanStatus::Error
    } else {
        SpanStatus::Ok
    };
    span.end(status);

    response
}
