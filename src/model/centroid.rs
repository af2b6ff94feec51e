//! Nearest-centroid classifier loaded from a JSON artifact.
//!
//! The artifact is produced offline by the training pipeline; at serving
//! time the model is a pure distance computation over a handful of class
//! centroids. Shipped defaults cover the three iris species so the
//! service can run without an artifact on disk.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Classifier, IrisFeatures, ModelError};

/// One class centroid from the artifact.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassCentroid {
    pub label: String,
    pub centroid: [f64; 4],
}

/// Serialized artifact shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelArtifact {
    pub classes: Vec<ClassCentroid>,
}

/// Nearest-centroid model over the iris feature space.
#[derive(Debug, Clone)]
pub struct NearestCentroidModel {
    classes: Vec<ClassCentroid>,
}

impl NearestCentroidModel {
    /// Load a model from a JSON artifact on disk.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::ArtifactIo {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|source| ModelError::ArtifactParse {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_artifact(artifact)
    }

    /// Build a model from an already-parsed artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        if artifact.classes.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        Ok(Self {
            classes: artifact.classes,
        })
    }

    /// The embedded fallback model: per-species means of the classic
    /// iris training set.
    pub fn builtin() -> Self {
        Self {
            classes: vec![
                ClassCentroid {
                    label: "setosa".to_string(),
                    centroid: [5.006, 3.428, 1.462, 0.246],
                },
                ClassCentroid {
                    label: "versicolor".to_string(),
                    centroid: [5.936, 2.770, 4.260, 1.326],
                },
                ClassCentroid {
                    label: "virginica".to_string(),
                    centroid: [6.588, 2.974, 5.552, 2.026],
                },
            ],
        }
    }

    fn squared_distance(a: &[f64; 4], b: &[f64; 4]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum()
    }
}

impl Classifier for NearestCentroidModel {
    fn predict(&self, features: &IrisFeatures) -> Result<String, ModelError> {
        if let Some(name) = features.first_non_finite() {
            return Err(ModelError::NonFiniteFeature { name });
        }

        let vector = features.as_vector();
        let mut best: Option<(&ClassCentroid, f64)> = None;
        for class in &self.classes {
            let dist = Self::squared_distance(&vector, &class.centroid);
            match best {
                Some((_, current)) if current <= dist => {}
                _ => best = Some((class, dist)),
            }
        }

        best.map(|(class, _)| class.label.clone())
            .ok_or(ModelError::EmptyModel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(sl: f64, sw: f64, pl: f64, pw: f64) -> IrisFeatures {
        IrisFeatures {
            sepal_length: sl,
            sepal_width: sw,
            petal_length: pl,
            petal_width: pw,
        }
    }

    #[test]
    fn classifies_canonical_setosa_sample() {
        let model = NearestCentroidModel::builtin();
        let label = model.predict(&features(5.1, 3.5, 1.4, 0.2)).unwrap();
        assert_eq!(label, "setosa");
    }

    #[test]
    fn classifies_large_petals_as_virginica() {
        let model = NearestCentroidModel::builtin();
        let label = model.predict(&features(6.7, 3.0, 5.8, 2.2)).unwrap();
        assert_eq!(label, "virginica");
    }

    #[test]
    fn rejects_non_finite_input() {
        let model = NearestCentroidModel::builtin();
        let err = model
            .predict(&features(f64::INFINITY, 3.0, 1.0, 0.5))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonFiniteFeature {
                name: "sepal_length"
            }
        ));
    }

    #[test]
    fn empty_artifact_is_rejected() {
        let err = NearestCentroidModel::from_artifact(ModelArtifact { classes: vec![] })
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyModel));
    }

    #[test]
    fn loads_artifact_from_disk() {
        let artifact = ModelArtifact {
            classes: vec![ClassCentroid {
                label: "only".to_string(),
                centroid: [1.0, 1.0, 1.0, 1.0],
            }],
        };
        let path = std::env::temp_dir().join("iris-api-artifact-test.json");
        std::fs::write(&path, serde_json::to_string(&artifact).unwrap()).unwrap();

        let model = NearestCentroidModel::load(&path).unwrap();
        let label = model.predict(&features(1.0, 1.0, 1.0, 1.0)).unwrap();
        assert_eq!(label, "only");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_artifact_reports_io_error() {
        let err =
            NearestCentroidModel::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactIo { .. }));
    }
}
