use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::AppError;

use super::domain::ApplicantForm;
use super::encoding::FeatureVector;
use super::intake::IntakeError;
use super::model::BinaryClassifier;
use super::page::{render_page, PagePanel};
use super::service::{LoanRiskService, PredictionError, PredictionOutcome};

/// Router builder exposing the intake form and the JSON prediction endpoints.
pub fn prediction_router<C>(service: Arc<LoanRiskService<C>>) -> Router
where
    C: BinaryClassifier + 'static,
{
    Router::new()
        .route("/", get(form_handler).post(form_submit_handler::<C>))
        .route("/api/v1/loan/predict", post(predict_handler::<C>))
        .route("/api/v1/loan/encode", post(encode_handler::<C>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PredictQuery {
    #[serde(default)]
    pub(crate) include_features: bool,
}

/// JSON body returned by the prediction endpoint.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub label: u8,
    pub verdict: &'static str,
    pub probability: f64,
    pub probability_percent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
}

impl PredictionResponse {
    pub fn from_outcome(outcome: &PredictionOutcome, include_features: bool) -> Self {
        let assessment = outcome.assessment;
        Self {
            label: assessment.label.class(),
            verdict: assessment.verdict(),
            probability: assessment.probability,
            probability_percent: assessment.probability_percent(),
            features: include_features.then_some(outcome.features),
        }
    }
}

pub(crate) async fn predict_handler<C>(
    State(service): State<Arc<LoanRiskService<C>>>,
    Query(query): Query<PredictQuery>,
    payload: Result<Json<ApplicantForm>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError>
where
    C: BinaryClassifier + 'static,
{
    let Json(form) = payload.map_err(|rejection| unreadable(rejection.body_text()))?;
    let outcome = service.predict(&form)?;
    Ok(Json(PredictionResponse::from_outcome(
        &outcome,
        query.include_features,
    )))
}

pub(crate) async fn encode_handler<C>(
    State(service): State<Arc<LoanRiskService<C>>>,
    payload: Result<Json<ApplicantForm>, JsonRejection>,
) -> Result<Json<FeatureVector>, AppError>
where
    C: BinaryClassifier + 'static,
{
    let Json(form) = payload.map_err(|rejection| unreadable(rejection.body_text()))?;
    Ok(Json(service.encode(&form)?))
}

pub(crate) async fn form_handler() -> Html<String> {
    Html(render_page(&ApplicantForm::default(), &PagePanel::Empty))
}

pub(crate) async fn form_submit_handler<C>(
    State(service): State<Arc<LoanRiskService<C>>>,
    payload: Result<Form<ApplicantForm>, FormRejection>,
) -> Response
where
    C: BinaryClassifier + 'static,
{
    let form = match payload {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let err = IntakeError::unreadable(rejection.body_text());
            warn!(field = err.field(), "form submission unreadable");
            let page = render_page(
                &ApplicantForm::default(),
                &PagePanel::Invalid(err.to_string()),
            );
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
        }
    };

    match service.predict(&form) {
        Ok(outcome) => {
            let page = render_page(&form, &PagePanel::Result(outcome.assessment));
            (StatusCode::OK, Html(page)).into_response()
        }
        Err(PredictionError::Intake(err)) => {
            let page = render_page(&form, &PagePanel::Invalid(err.to_string()));
            (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
        }
        Err(PredictionError::Scoring(err)) => {
            error!(error = %err, "scoring failed for form submission");
            let page = render_page(
                &form,
                &PagePanel::Invalid("prediction is temporarily unavailable".to_string()),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response()
        }
    }
}

fn unreadable(detail: String) -> AppError {
    let err = IntakeError::unreadable(detail);
    warn!(field = err.field(), "json submission unreadable");
    AppError::Intake(err)
}
