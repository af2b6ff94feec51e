//! Structured logging initialization.
//!
//! # Responsibilities
//! - Install the global tracing subscriber once, early in main
//! - JSON single-line records in production, pretty format for development
//! - Level configurable via config, overridable via RUST_LOG
//!
//! # Design Decisions
//! - Log records are tracing events with structured fields; the trace_id
//!   field on each request-scoped event is the correlation key
//! - Subscriber failures at init are fatal (misconfigured observability
//!   is a startup error); emit failures after init never reach handlers

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global subscriber according to config.
///
/// `RUST_LOG` takes precedence over the configured level so operators
/// can raise verbosity without a config rollout.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false),
            )
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
