//! Inference model collaborator.
//!
//! # Responsibilities
//! - Define the `Classifier` seam the HTTP layer calls through
//! - Represent the fixed four-field feature record
//! - Hold the write-once model slot filled by startup
//!
//! # Design Decisions
//! - The model is opaque to the service: loaded once, stateless, pure
//! - `Classifier` is a trait so tests can inject failing models
//! - The slot is write-once; readers that see `ready == true` always
//!   find the model published

pub mod centroid;

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use centroid::NearestCentroidModel;

/// One iris measurement record, in centimeters.
///
/// Doubles as the wire shape of the prediction request body: all four
/// fields are required and must be numeric.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct IrisFeatures {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl IrisFeatures {
    /// Feature vector in canonical column order.
    pub fn as_vector(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }

    /// Name of the first non-finite feature, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        const NAMES: [&str; 4] = [
            "sepal_length",
            "sepal_width",
            "petal_length",
            "petal_width",
        ];
        self.as_vector()
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| NAMES[i])
    }
}

/// Failures raised by the model collaborator.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    ArtifactIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {source}")]
    ArtifactParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifact defines no classes")]
    EmptyModel,

    #[error("feature {name} is not a finite number")]
    NonFiniteFeature { name: &'static str },
}

/// A pre-trained, stateless decision function.
pub trait Classifier: Send + Sync {
    /// Predict the class label for one feature record.
    fn predict(&self, features: &IrisFeatures) -> Result<String, ModelError>;
}

/// Write-once container the startup task publishes the model into.
///
/// Request handlers read it lock-free; before startup completes it is
/// empty and traffic-dependent routes report not-ready.
#[derive(Default)]
pub struct ModelSlot {
    inner: OnceLock<Arc<dyn Classifier>>,
}

impl ModelSlot {
    pub fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Publish the loaded model. Returns false if already published.
    pub fn publish(&self, model: Arc<dyn Classifier>) -> bool {
        self.inner.set(model).is_ok()
    }

    /// The published model, if startup has completed.
    pub fn get(&self) -> Option<&Arc<dyn Classifier>> {
        self.inner.get()
    }
}
