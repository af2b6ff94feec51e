//! Per-request trace context and asynchronous span export.
//!
//! # Responsibilities
//! - Mint trace/span identifiers for each inbound request
//! - Continue an inbound W3C `traceparent` when one is present
//! - Hand finished spans to the export collaborator off the response path
//!
//! # Design Decisions
//! - Export is fire-and-forget over an unbounded channel: a slow or dead
//!   exporter never blocks a response
//! - Export failures are logged locally and swallowed
//! - A dropped-but-unended handle still flushes, so every exit path
//!   (success, failure, disconnect) preserves trace continuity

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use uuid::Uuid;

/// Correlation identifiers for one unit of work.
///
/// The trace id is shared by every span and log record produced while
/// handling one request; span ids identify individual timed operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: u128,
    pub span_id: u64,
    pub parent_span_id: Option<u64>,
}

impl TraceContext {
    /// Fresh root context with random identifiers.
    pub fn new_root() -> Self {
        Self {
            trace_id: Uuid::new_v4().as_u128(),
            span_id: rand::random(),
            parent_span_id: None,
        }
    }

    /// Child context: same trace, new span, parent recorded.
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id,
            span_id: rand::random(),
            parent_span_id: Some(self.span_id),
        }
    }

    /// Continue a trace from a W3C `traceparent` header value
    /// (`00-<32 hex>-<16 hex>-<2 hex>`). Returns `None` on any malformed
    /// input; callers fall back to a fresh root.
    pub fn from_traceparent(value: &str) -> Option<Self> {
        let mut parts = value.split('-');
        let version = parts.next()?;
        let trace_hex = parts.next()?;
        let span_hex = parts.next()?;
        let _flags = parts.next()?;
        if parts.next().is_some() || version != "00" {
            return None;
        }
        if trace_hex.len() != 32 || span_hex.len() != 16 {
            return None;
        }
        let trace_id = u128::from_str_radix(trace_hex, 16).ok()?;
        let parent_span_id = u64::from_str_radix(span_hex, 16).ok()?;
        if trace_id == 0 {
            return None;
        }
        Some(Self {
            trace_id,
            span_id: rand::random(),
            parent_span_id: Some(parent_span_id),
        })
    }

    /// Trace id as exactly 32 lowercase hex characters.
    pub fn trace_id_hex(&self) -> String {
        format!("{:032x}", self.trace_id)
    }

    /// Span id as exactly 16 lowercase hex characters.
    pub fn span_id_hex(&self) -> String {
        format!("{:016x}", self.span_id)
    }
}

/// Terminal status of a finished span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStatus {
    Ok,
    Error,
    /// Handle dropped without an explicit end (early exit path).
    Unset,
}

impl SpanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanStatus::Ok => "ok",
            SpanStatus::Error => "error",
            SpanStatus::Unset => "unset",
        }
    }
}

/// A completed span, ready for export.
#[derive(Debug, Clone)]
pub struct FinishedSpan {
    pub name: &'static str,
    pub trace_id: String,
    pub span_id: String,
    pub parent_span_id: Option<String>,
    pub duration_ms: f64,
    pub status: SpanStatus,
}

/// Destination for finished spans (the export collaborator).
pub trait SpanSink: Send + Sync {
    fn export(&self, span: &FinishedSpan) -> Result<(), SpanExportError>;
}

/// Export failure; always handled locally, never surfaced to callers.
#[derive(Debug, thiserror::Error)]
#[error("span export failed: {0}")]
pub struct SpanExportError(pub String);

/// Default sink: writes spans as debug-level structured records.
pub struct LogSpanSink;

impl SpanSink for LogSpanSink {
    fn export(&self, span: &FinishedSpan) -> Result<(), SpanExportError> {
        tracing::debug!(
            target: "iris_api::span_export",
            span_name = span.name,
            trace_id = %span.trace_id,
            span_id = %span.span_id,
            parent_span_id = span.parent_span_id.as_deref().unwrap_or(""),
            duration_ms = span.duration_ms,
            status = span.status.as_str(),
            "span finished"
        );
        Ok(())
    }
}

/// Handle for an in-flight span. Ends on `end()` or on drop.
pub struct SpanHandle {
    ctx: TraceContext,
    name: &'static str,
    start: Instant,
    tx: Option<mpsc::UnboundedSender<FinishedSpan>>,
}

impl SpanHandle {
    /// The identifiers this span runs under.
    pub fn context(&self) -> &TraceContext {
        &self.ctx
    }

    /// Trace id as 32 hex chars, for log and envelope correlation.
    pub fn trace_id_hex(&self) -> String {
        self.ctx.trace_id_hex()
    }

    /// Finalize the span and queue it for export. Never blocks.
    pub fn end(mut self, status: SpanStatus) {
        self.finish(status);
    }

    fn finish(&mut self, status: SpanStatus) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        let span = FinishedSpan {
            name: self.name,
            trace_id: self.ctx.trace_id_hex(),
            span_id: self.ctx.span_id_hex(),
            parent_span_id: self.ctx.parent_span_id.map(|id| format!("{:016x}", id)),
            duration_ms: self.start.elapsed().as_secs_f64() * 1000.0,
            status,
        };
        // Receiver gone means the exporter task is shutting down; the
        // span is dropped silently rather than delaying the response.
        let _ = tx.send(span);
    }
}

impl Drop for SpanHandle {
    fn drop(&mut self) {
        self.finish(SpanStatus::Unset);
    }
}

/// Span factory shared by middleware and handlers.
#[derive(Clone)]
pub struct Tracer {
    tx: mpsc::UnboundedSender<FinishedSpan>,
}

impl Tracer {
    /// Create a tracer and the receiving end for the exporter task.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FinishedSpan>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Open a root span with a fresh trace id.
    pub fn begin_span(&self, name: &'static str) -> SpanHandle {
        self.span_with_context(name, TraceContext::new_root())
    }

    /// Open a span continuing an existing context (inbound propagation
    /// or a child operation within a request).
    pub fn begin_child(&self, name: &'static str, parent: &TraceContext) -> SpanHandle {
        self.span_with_context(name, parent.child())
    }

    /// Open a root span for an already-built context (e.g. parsed from
    /// an inbound `traceparent`).
    pub fn span_with_context(&self, name: &'static str, ctx: TraceContext) -> SpanHandle {
        SpanHandle {
            ctx,
            name,
            start: Instant::now(),
            tx: Some(self.tx.clone()),
        }
    }
}

/// Drain finished spans into the sink until all senders are gone.
pub fn spawn_exporter(
    mut rx: mpsc::UnboundedReceiver<FinishedSpan>,
    sink: Arc<dyn SpanSink>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(span) = rx.recv().await {
            if let Err(error) = sink.export(&span) {
                tracing::debug!(error = %error, "span export failed");
            }
        }
    })
}
