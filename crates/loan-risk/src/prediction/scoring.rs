use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::encoding::{FeatureVector, FEATURE_COLUMNS};
use super::model::{BinaryClassifier, LoadedModel, ModelLoader};

/// Error raised by the scoring adapter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("classifier unavailable ({source_name}): {reason}")]
    ModelUnavailable { source_name: String, reason: String },
    #[error("feature schema mismatch: {detail}")]
    EncodingMismatch { detail: String },
}

/// Hard decision of the classifier; 1 means high risk of default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    LowRisk,
    HighRisk,
}

impl RiskLabel {
    pub const fn from_class(class: u8) -> Self {
        if class == 1 {
            Self::HighRisk
        } else {
            Self::LowRisk
        }
    }

    pub const fn class(self) -> u8 {
        match self {
            Self::LowRisk => 0,
            Self::HighRisk => 1,
        }
    }

    pub const fn verdict(self) -> &'static str {
        match self {
            Self::HighRisk => "High Risk of Default",
            Self::LowRisk => "Low Risk Applicant",
        }
    }
}

/// Scoring result for one applicant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub label: RiskLabel,
    /// Probability of default (positive class).
    pub probability: f64,
}

impl RiskAssessment {
    pub fn verdict(&self) -> &'static str {
        self.label.verdict()
    }

    /// Probability as a percentage with two decimals, e.g. `"37.52%"`.
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}

/// Scoring adapter over a shared, read-only classifier handle.
pub struct RiskScorer<C> {
    classifier: Arc<C>,
}

impl<C> Clone for RiskScorer<C> {
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl RiskScorer<LoadedModel> {
    /// Load the artifact once and wrap it. Fails with `ModelUnavailable` or,
    /// when the artifact was trained on another column layout, `EncodingMismatch`.
    pub fn from_artifact_path<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let model = ModelLoader::new().load(path)?;
        Self::new(Arc::new(model))
    }
}

impl<C> RiskScorer<C>
where
    C: BinaryClassifier + 'static,
{
    pub fn new(classifier: Arc<C>) -> Result<Self, ScoringError> {
        check_schema(classifier.feature_names(), &FEATURE_COLUMNS)?;
        Ok(Self { classifier })
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn score(&self, features: &FeatureVector) -> Result<RiskAssessment, ScoringError> {
        check_schema(self.classifier.feature_names(), features.columns())?;

        let row = features.values();
        let class = self.classifier.predict(row);
        if class > 1 {
            return Err(ScoringError::EncodingMismatch {
                detail: format!("classifier produced non-binary label {class}"),
            });
        }
        let [_, positive] = self.classifier.predict_proba(row);
        let probability = positive.clamp(0.0, 1.0);

        let assessment = RiskAssessment {
            label: RiskLabel::from_class(class),
            probability,
        };
        debug!(
            label = assessment.label.class(),
            probability = assessment.probability,
            "applicant scored"
        );
        Ok(assessment)
    }
}

fn check_schema(expected: &[String], provided: &[&str]) -> Result<(), ScoringError> {
    if expected.len() != provided.len() {
        return Err(ScoringError::EncodingMismatch {
            detail: format!(
                "classifier expects {} features, encoder produced {}",
                expected.len(),
                provided.len()
            ),
        });
    }

    for (index, (want, got)) in expected.iter().zip(provided.iter().copied()).enumerate() {
        if want.as_str() != got {
            return Err(ScoringError::EncodingMismatch {
                detail: format!("column {index} is '{got}', classifier expects '{want}'"),
            });
        }
    }

    Ok(())
}
