//! Loan applicant intake, feature encoding and default-risk scoring.

pub mod domain;
pub mod encoding;
pub mod intake;
pub mod model;
pub mod page;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantForm, ApplicantRecord, Education, EmploymentType, LoanPurpose, LoanTerm,
    MaritalStatus, UnknownCategory, YesNo,
};
pub use encoding::{FeatureEncoder, FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};
pub use intake::{IntakeError, IntakeGuard};
pub use model::{BinaryClassifier, LoadedModel, ModelArtifact, ModelLoader};
pub use router::{prediction_router, PredictionResponse};
pub use scoring::{RiskAssessment, RiskLabel, RiskScorer, ScoringError};
pub use service::{LoanRiskService, PredictionError, PredictionOutcome};
