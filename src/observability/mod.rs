//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! request handling produces:
//!     → logging.rs (structured events: prediction, prediction_error,
//!                   unhandled_exception)
//!     → trace.rs   (spans, exported asynchronously)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//!     → Span sink (pluggable; default writes debug records)
//! ```
//!
//! # Design Decisions
//! - One trace id flows through span, log records, and error envelope
//! - Span export never blocks the response path
//! - Probe routes are excluded from spans and events to cap volume

pub mod logging;
pub mod metrics;
pub mod trace;

pub use trace::{
    FinishedSpan, LogSpanSink, SpanHandle, SpanSink, SpanStatus, TraceContext, Tracer,
};
