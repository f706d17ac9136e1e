use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::prediction::domain::{
    ApplicantForm, ApplicantRecord, Education, EmploymentType, LoanPurpose, LoanTerm,
    MaritalStatus, YesNo,
};
use crate::prediction::encoding::FEATURE_COLUMNS;
use crate::prediction::model::{
    BinaryClassifier, ClassifierSpec, LoadedModel, ModelArtifact, ModelLoader,
};
use crate::prediction::{prediction_router, LoanRiskService, RiskScorer};

/// Applicant from the reference scenario: Bachelor's, Full-time, Divorced, Home.
pub(super) fn scenario_form() -> ApplicantForm {
    ApplicantForm {
        age: 30,
        income: 50_000,
        loan_amount: 20_000,
        credit_score: 650,
        months_employed: 12,
        num_credit_lines: 2,
        interest_rate: 10.0,
        loan_term: 36,
        dti_ratio: 0.3,
        has_mortgage: "No".to_string(),
        has_dependents: "No".to_string(),
        has_co_signer: "No".to_string(),
        education: "Bachelor's".to_string(),
        employment_type: "Full-time".to_string(),
        marital_status: "Divorced".to_string(),
        loan_purpose: "Home".to_string(),
    }
}

pub(super) fn scenario_record() -> ApplicantRecord {
    ApplicantRecord {
        age: 30,
        income: 50_000,
        loan_amount: 20_000,
        credit_score: 650,
        months_employed: 12,
        num_credit_lines: 2,
        interest_rate: 10.0,
        loan_term: LoanTerm::Months36,
        dti_ratio: 0.3,
        has_mortgage: YesNo::No,
        has_dependents: YesNo::No,
        has_co_signer: YesNo::No,
        education: Education::Bachelors,
        employment_type: EmploymentType::FullTime,
        marital_status: MaritalStatus::Divorced,
        loan_purpose: LoanPurpose::Home,
    }
}

/// Applicant that any sensible default model flags.
pub(super) fn stretched_form() -> ApplicantForm {
    ApplicantForm {
        age: 19,
        income: 15_000,
        loan_amount: 250_000,
        credit_score: 320,
        months_employed: 0,
        num_credit_lines: 18,
        interest_rate: 24.0,
        loan_term: 60,
        dti_ratio: 0.9,
        has_mortgage: "No".to_string(),
        has_dependents: "No".to_string(),
        has_co_signer: "No".to_string(),
        education: "High School".to_string(),
        employment_type: "Unemployed".to_string(),
        marital_status: "Single".to_string(),
        loan_purpose: "Business".to_string(),
    }
}

/// Logistic artifact over the trained column layout.
pub(super) fn logistic_artifact() -> ModelArtifact {
    let mut coefficients = vec![0.0; FEATURE_COLUMNS.len()];
    // CreditScore, InterestRate, DTIRatio, EmploymentType_Unemployed
    coefficients[3] = -0.01;
    coefficients[6] = 0.1;
    coefficients[8] = 2.0;
    coefficients[18] = 1.5;

    ModelArtifact {
        name: "fixture-logistic".to_string(),
        feature_names: FEATURE_COLUMNS.iter().map(|name| name.to_string()).collect(),
        classifier: ClassifierSpec::LogisticRegression {
            coefficients,
            intercept: 4.0,
        },
    }
}

pub(super) fn logistic_model() -> LoadedModel {
    let raw = serde_json::to_string(&logistic_artifact()).expect("artifact serializes");
    ModelLoader::new()
        .parse(&raw, "fixture")
        .expect("fixture artifact loads")
}

pub(super) fn build_service() -> LoanRiskService<LoadedModel> {
    let scorer = RiskScorer::new(Arc::new(logistic_model())).expect("schema matches");
    LoanRiskService::new(scorer)
}

pub(super) fn router() -> axum::Router {
    prediction_router(Arc::new(build_service()))
}

/// Classifier double returning a fixed distribution.
pub(super) struct FixedClassifier {
    pub(super) names: Vec<String>,
    pub(super) distribution: [f64; 2],
}

impl FixedClassifier {
    pub(super) fn new(distribution: [f64; 2]) -> Self {
        Self {
            names: FEATURE_COLUMNS.iter().map(|name| name.to_string()).collect(),
            distribution,
        }
    }
}

impl BinaryClassifier for FixedClassifier {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn predict_proba(&self, _row: &[f64]) -> [f64; 2] {
        self.distribution
    }
}

/// Classifier that violates the binary label contract.
pub(super) struct MulticlassClassifier(pub(super) FixedClassifier);

impl BinaryClassifier for MulticlassClassifier {
    fn feature_names(&self) -> &[String] {
        self.0.feature_names()
    }

    fn predict_proba(&self, row: &[f64]) -> [f64; 2] {
        self.0.predict_proba(row)
    }

    fn predict(&self, _row: &[f64]) -> u8 {
        2
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
