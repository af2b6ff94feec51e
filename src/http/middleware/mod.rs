//! Request interceptor pipeline.
//!
//! # Ordering
//! ```text
//! inbound ─▶ timing (outermost) ─▶ trace_context ─▶ timeout ─▶ handler
//! response ◀─ stamp header ◀──── end span ◀──────────────── handler
//! ```
//!
//! Timing wraps everything so the stamped latency includes span close
//! and envelope construction; the trace context must exist before any
//! handler work so every log record shares the request's trace id.
//! trace_context is also the last-resort chokepoint: it catches panics
//! escaping the inner pipeline and maps them to the error envelope
//! with the active trace id.

pub mod timing;
pub mod trace_context;

pub use timing::{stamp_process_time, PROCESS_TIME_HEADER};
pub use trace_context::inject_trace_context;
