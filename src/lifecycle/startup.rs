//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the model artifact (the possibly-slow startup work)
//! - Publish it into the write-once slot
//! - Flip readiness exactly once, after everything above succeeded
//!
//! # Design Decisions
//! - An explicit awaited step rather than a framework hook, so tests
//!   drive the readiness state machine without the network layer
//! - Runs concurrently with the server in main: probes answer 503
//!   while the load is in flight instead of hanging
//! - Fail fast: any startup error leaves the service not-ready

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::ServiceConfig;
use crate::health::ReadinessState;
use crate::model::{Classifier, IrisFeatures, ModelError, ModelSlot, NearestCentroidModel};

/// Failures during startup. The process stays not-ready on any of them.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("model load failed: {0}")]
    Model(#[from] ModelError),

    #[error("model load task aborted: {0}")]
    LoadTask(#[from] tokio::task::JoinError),
}

/// Load the model, publish it, and mark the process ready.
pub async fn initialize(
    config: &ServiceConfig,
    slot: &Arc<ModelSlot>,
    readiness: &Arc<ReadinessState>,
) -> Result<(), StartupError> {
    let model: Arc<dyn Classifier> = match &config.model.artifact_path {
        Some(path) => {
            let artifact = PathBuf::from(path);
            let loaded =
                tokio::task::spawn_blocking(move || NearestCentroidModel::load(&artifact))
                    .await??;
            tracing::info!(artifact = %path, "model artifact loaded");
            Arc::new(loaded)
        }
        None => {
            tracing::info!("no artifact configured, using embedded model");
            Arc::new(NearestCentroidModel::builtin())
        }
    };

    // Warm-up prediction: proves the published model is actually usable
    // before readiness flips.
    let probe = IrisFeatures {
        sepal_length: 5.1,
        sepal_width: 3.5,
        petal_length: 1.4,
        petal_width: 0.2,
    };
    let label = model.predict(&probe)?;
    tracing::debug!(label = %label, "warm-up prediction complete");

    slot.publish(model);
    readiness.mark_ready();
    Ok(())
}
