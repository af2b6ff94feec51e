//! Iris Classifier Inference Service
//!
//! A synchronous inference endpoint behind a production HTTP service,
//! built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │               INFERENCE SERVICE               │
//!                      │                                               │
//!   Client Request     │  ┌────────┐   ┌───────────────┐   ┌────────┐ │
//!   ──────────────────▶│  │ timing │──▶│ trace context │──▶│handlers│ │
//!                      │  │ clock  │   │  + span open  │   │+ model │ │
//!                      │  └────────┘   └───────────────┘   └───┬────┘ │
//!                      │                                       │      │
//!   Client Response    │  ┌────────┐   ┌───────────────┐       ▼      │
//!   ◀──────────────────│  │ header │◀──│   span end    │◀──[error    │
//!                      │  │ stamp  │   │ (async export)│    envelope] │
//!                      │  └────────┘   └───────────────┘              │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │         Cross-Cutting Concerns           │ │
//!                      │  │  config │ readiness │ logging │ metrics  │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use iris_api::config;
use iris_api::health::ReadinessState;
use iris_api::http::{AppState, HttpServer};
use iris_api::lifecycle::{self, Shutdown};
use iris_api::model::ModelSlot;
use iris_api::observability::{self, trace::LogSpanSink, Tracer};

#[derive(Debug, Parser)]
#[command(name = "iris-api", about = "Iris classifier inference service")]
struct Args {
    /// Path to the TOML config file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;

    observability::logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        artifact = config.model.artifact_path.as_deref().unwrap_or("<embedded>"),
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            );
        }
    }

    // Bind before startup work so probes are servable while not-ready.
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let readiness = Arc::new(ReadinessState::new());
    let model_slot = Arc::new(ModelSlot::new());

    let (tracer, spans) = Tracer::new();
    observability::trace::spawn_exporter(spans, Arc::new(LogSpanSink));

    {
        let config = config.clone();
        let model_slot = model_slot.clone();
        let readiness = readiness.clone();
        tokio::spawn(async move {
            if let Err(error) = lifecycle::initialize(&config, &model_slot, &readiness).await {
                tracing::error!(error = %error, "startup failed; service stays not-ready");
            }
        });
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    lifecycle::shutdown::trigger_on_ctrl_c(shutdown);

    let state = AppState::new(model_slot, readiness, tracer);
    let server = HttpServer::new(&config, state);
    server.run(listener, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
