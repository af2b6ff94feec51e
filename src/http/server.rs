//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all routes
//! - Wire up the interceptor pipeline (timing, trace context, timeout)
//! - Bind the server to a listener and serve until shutdown
//!
//! # Layering
//! Axum applies the last-added layer outermost, so the order below puts
//! timing around the whole pipeline and the request timeout closest to
//! the handler.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::health::ReadinessState;
use crate::http::handlers;
use crate::http::middleware::{inject_trace_context, stamp_process_time};
use crate::model::ModelSlot;
use crate::observability::Tracer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelSlot>,
    pub readiness: Arc<ReadinessState>,
    pub tracer: Tracer,
}

impl AppState {
    pub fn new(model: Arc<ModelSlot>, readiness: Arc<ReadinessState>, tracer: Tracer) -> Self {
        Self {
            model,
            readiness,
            tracer,
        }
    }
}

/// HTTP server for the inference service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and state.
    pub fn new(config: &ServiceConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let tracer = state.tracer.clone();
        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/live_check", get(handlers::live_check))
            .route("/ready_check", get(handlers::ready_check))
            .route("/predict", post(handlers::predict))
            .route("/predict/", post(handlers::predict))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(middleware::from_fn_with_state(tracer, inject_trace_context))
            .layer(middleware::from_fn(stamp_process_time))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
