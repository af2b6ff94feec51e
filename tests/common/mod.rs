//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use iris_api::config::ServiceConfig;
use iris_api::health::ReadinessState;
use iris_api::http::{AppState, HttpServer};
use iris_api::lifecycle::Shutdown;
use iris_api::model::{Classifier, IrisFeatures, ModelError, ModelSlot, NearestCentroidModel};
use iris_api::observability::{trace, LogSpanSink, Tracer};

/// A running service instance bound to an ephemeral port.
pub struct TestService {
    pub addr: SocketAddr,
    pub readiness: Arc<ReadinessState>,
    pub model_slot: Arc<ModelSlot>,
    // Held so the server keeps running for the test's lifetime.
    #[allow(dead_code)]
    pub shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// A model that always fails, for exercising the 500 envelope path.
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _features: &IrisFeatures) -> Result<String, ModelError> {
        Err(ModelError::EmptyModel)
    }
}

/// A model that panics, for exercising the last-resort mapping.
pub struct PanickingClassifier;

impl Classifier for PanickingClassifier {
    fn predict(&self, _features: &IrisFeatures) -> Result<String, ModelError> {
        panic!("classifier invariant violated")
    }
}

async fn spawn(model: Option<Arc<dyn Classifier>>) -> TestService {
    let config = ServiceConfig::default();
    let readiness = Arc::new(ReadinessState::new());
    let model_slot = Arc::new(ModelSlot::new());
    if let Some(model) = model {
        model_slot.publish(model);
        readiness.mark_ready();
    }

    let (tracer, spans) = Tracer::new();
    trace::spawn_exporter(spans, Arc::new(LogSpanSink));

    let state = AppState::new(model_slot.clone(), readiness.clone(), tracer);
    let server = HttpServer::new(&config, state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestService {
        addr,
        readiness,
        model_slot,
        shutdown,
    }
}

/// Service with the embedded model published and readiness flipped.
#[allow(dead_code)]
pub async fn spawn_ready_service() -> TestService {
    let model: Arc<dyn Classifier> = Arc::new(NearestCentroidModel::builtin());
    spawn(Some(model)).await
}

/// Service before startup completes: no model, not ready.
#[allow(dead_code)]
pub async fn spawn_cold_service() -> TestService {
    spawn(None).await
}

/// Service whose model fails every prediction.
#[allow(dead_code)]
pub async fn spawn_failing_service() -> TestService {
    let model: Arc<dyn Classifier> = Arc::new(FailingClassifier);
    spawn(Some(model)).await
}

/// Service whose model panics on every prediction.
#[allow(dead_code)]
pub async fn spawn_panicking_service() -> TestService {
    let model: Arc<dyn Classifier> = Arc::new(PanickingClassifier);
    spawn(Some(model)).await
}
