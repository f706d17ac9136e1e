use std::fs;
use std::path::Path;

use tracing::info;

use super::artifact::{ClassifierSpec, ModelArtifact};
use super::BinaryClassifier;
use crate::prediction::scoring::ScoringError;

/// Classifier held in memory for the lifetime of the process. Never mutated after load.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    artifact: ModelArtifact,
}

impl LoadedModel {
    pub fn name(&self) -> &str {
        &self.artifact.name
    }

    pub fn kind(&self) -> &'static str {
        match self.artifact.classifier {
            ClassifierSpec::LogisticRegression { .. } => "logistic_regression",
            ClassifierSpec::TreeEnsemble { .. } => "tree_ensemble",
        }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }
}

impl BinaryClassifier for LoadedModel {
    fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    fn predict_proba(&self, row: &[f64]) -> [f64; 2] {
        let positive = self.artifact.positive_probability(row).clamp(0.0, 1.0);
        [1.0 - positive, positive]
    }
}

/// Reads JSON model artifacts from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelLoader;

impl ModelLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and validate an artifact. Any failure means the model is unavailable.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel, ScoringError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading classifier artifact");

        let raw = fs::read_to_string(path).map_err(|err| ScoringError::ModelUnavailable {
            source_name: path.display().to_string(),
            reason: err.to_string(),
        })?;

        let model = self.parse(&raw, &path.display().to_string())?;

        info!(
            model = %model.name(),
            kind = model.kind(),
            features = model.feature_names().len(),
            "classifier artifact loaded"
        );
        Ok(model)
    }

    /// Parse an artifact already held in memory. `source_name` only labels errors.
    pub fn parse(&self, raw: &str, source_name: &str) -> Result<LoadedModel, ScoringError> {
        let unavailable = |reason: String| ScoringError::ModelUnavailable {
            source_name: source_name.to_string(),
            reason,
        };

        let artifact: ModelArtifact =
            serde_json::from_str(raw).map_err(|err| unavailable(err.to_string()))?;
        artifact.validate().map_err(unavailable)?;

        Ok(LoadedModel { artifact })
    }
}
