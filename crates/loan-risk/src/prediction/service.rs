use tracing::{info, warn};

use super::domain::ApplicantForm;
use super::encoding::{FeatureEncoder, FeatureVector};
use super::intake::{IntakeError, IntakeGuard};
use super::model::BinaryClassifier;
use super::scoring::{RiskAssessment, RiskScorer, ScoringError};

/// Service composing intake validation, feature encoding and scoring.
pub struct LoanRiskService<C> {
    guard: IntakeGuard,
    encoder: FeatureEncoder,
    scorer: RiskScorer<C>,
}

/// Everything produced for one prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub assessment: RiskAssessment,
    pub features: FeatureVector,
}

impl<C> LoanRiskService<C>
where
    C: BinaryClassifier + 'static,
{
    pub fn new(scorer: RiskScorer<C>) -> Self {
        Self {
            guard: IntakeGuard,
            encoder: FeatureEncoder::new(),
            scorer,
        }
    }

    pub fn scorer(&self) -> &RiskScorer<C> {
        &self.scorer
    }

    /// Validate and encode without scoring.
    pub fn encode(&self, form: &ApplicantForm) -> Result<FeatureVector, PredictionError> {
        let record = self.guard.record_from_form(form).inspect_err(log_rejection)?;
        Ok(self.encoder.encode(&record))
    }

    pub fn predict(&self, form: &ApplicantForm) -> Result<PredictionOutcome, PredictionError> {
        let features = self.encode(form)?;
        let assessment = self.scorer.score(&features)?;

        info!(
            label = assessment.label.class(),
            probability = assessment.probability,
            "loan risk prediction served"
        );

        Ok(PredictionOutcome {
            assessment,
            features,
        })
    }
}

fn log_rejection(error: &IntakeError) {
    warn!(field = error.field(), "applicant submission rejected");
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
