use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::prediction::domain::ApplicantForm;
use crate::prediction::encoding::FEATURE_COLUMNS;
use crate::prediction::model::LoadedModel;
use crate::prediction::router::{predict_handler, PredictQuery};
use crate::prediction::{prediction_router, LoanRiskService, RiskScorer};

fn json_request(uri: &str, form: &ApplicantForm) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(form).expect("form serializes")))
        .expect("request builds")
}

#[tokio::test]
async fn predict_handler_returns_verdict_and_percentage() {
    let service = Arc::new(build_service());

    let response = predict_handler::<LoadedModel>(
        State(service),
        Query(PredictQuery::default()),
        Ok(Json(scenario_form())),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["label"], 0);
    assert_eq!(payload["verdict"], "Low Risk Applicant");
    assert_eq!(payload["probability_percent"], "28.91%");
    assert!(payload.get("features").is_none());
}

#[tokio::test]
async fn predict_route_can_include_ordered_features() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/loan/predict?include_features=true",
            &stretched_form(),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["label"], 1);
    assert_eq!(payload["verdict"], "High Risk of Default");
    let features = payload["features"].as_object().expect("features object");
    assert_eq!(features.len(), FEATURE_COLUMNS.len());
    assert_eq!(features["EmploymentType_Unemployed"], 1.0);
}

#[tokio::test]
async fn predict_route_rejects_unknown_categories() {
    let form = ApplicantForm {
        education: "Bootcamp".to_string(),
        ..scenario_form()
    };

    let response = router()
        .oneshot(json_request("/api/v1/loan/predict", &form))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], "Education");
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("Bootcamp"));
}

#[tokio::test]
async fn encode_route_returns_feature_vector_in_model_order() {
    let response = router()
        .oneshot(json_request("/api/v1/loan/encode", &scenario_form()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_text_body(response).await;
    let age = body.find("\"Age\"").expect("Age present");
    let purpose = body.find("\"Purpose_Other\"").expect("Purpose_Other present");
    assert!(age < purpose);
    assert!(body.contains("\"Education_Bachelor's\":1.0"));
}

#[tokio::test]
async fn form_page_renders_with_defaults() {
    let response = router()
        .oneshot(Request::get("/").body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let html = read_text_body(response).await;
    assert!(html.contains("Loan Default Prediction System"));
    assert!(html.contains("Predict Loan Risk"));
}

#[tokio::test]
async fn form_submission_renders_result_panel() {
    let body = "Age=30&Income=50000&LoanAmount=20000&CreditScore=650&MonthsEmployed=12\
        &NumCreditLines=2&InterestRate=10.0&LoanTerm=36&DTIRatio=0.3&HasMortgage=No\
        &HasDependents=No&HasCoSigner=No&Education=Bachelor%27s&EmploymentType=Full-time\
        &MaritalStatus=Divorced&LoanPurpose=Home";

    let response = router()
        .oneshot(
            Request::post("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let html = read_text_body(response).await;
    assert!(html.contains("Low Risk Applicant"));
    assert!(html.contains("Default Probability: <strong>28.91%</strong>"));
}

#[tokio::test]
async fn form_submission_with_bad_choice_shows_validation_message() {
    let body = "Age=30&Income=50000&LoanAmount=20000&CreditScore=650&MonthsEmployed=12\
        &NumCreditLines=2&InterestRate=10.0&LoanTerm=36&DTIRatio=0.3&HasMortgage=Maybe\
        &HasDependents=No&HasCoSigner=No&Education=PhD&EmploymentType=Full-time\
        &MaritalStatus=Divorced&LoanPurpose=Home";

    let response = router()
        .oneshot(
            Request::post("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = read_text_body(response).await;
    assert!(html.contains("HasMortgage has value &#39;Maybe&#39;"));
    assert!(!html.contains("Default Probability"));
}

fn raw_json_request(uri: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn form_request(body: &'static str) -> Request<Body> {
    Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("request builds")
}

fn scenario_payload() -> serde_json::Value {
    serde_json::to_value(scenario_form()).expect("form serializes")
}

/// Router over a classifier that reports a label outside {0, 1}.
fn faulty_router() -> axum::Router {
    let classifier = MulticlassClassifier(FixedClassifier::new([0.3, 0.7]));
    let scorer = RiskScorer::new(Arc::new(classifier)).expect("schema matches");
    prediction_router(Arc::new(LoanRiskService::new(scorer)))
}

#[tokio::test]
async fn predict_route_reports_fractional_whole_numbers_as_json() {
    let mut payload = scenario_payload();
    payload["Age"] = json!(30.5);

    let response = router()
        .oneshot(raw_json_request("/api/v1/loan/predict", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], "Age");
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("could not be read"));
}

#[tokio::test]
async fn predict_route_reports_negative_age_as_out_of_range() {
    let mut payload = scenario_payload();
    payload["Age"] = json!(-1);

    let response = router()
        .oneshot(raw_json_request("/api/v1/loan/predict", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], "Age");
    assert_eq!(body["error"], "Age must be between 18 and 100 (found -1)");
}

#[tokio::test]
async fn encode_route_reports_malformed_json_with_error_shape() {
    let response = router()
        .oneshot(
            Request::post("/api/v1/loan/encode")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"Age\": "))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].is_string());
    assert!(body.get("field").is_some());
}

#[tokio::test]
async fn form_submission_with_blank_number_rerenders_page() {
    let response = router()
        .oneshot(form_request(
            "Age=&Income=50000&LoanAmount=20000&CreditScore=650&MonthsEmployed=12\
             &NumCreditLines=2&InterestRate=10.0&LoanTerm=36&DTIRatio=0.3&HasMortgage=No\
             &HasDependents=No&HasCoSigner=No&Education=PhD&EmploymentType=Full-time\
             &MaritalStatus=Divorced&LoanPurpose=Home",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = read_text_body(response).await;
    assert!(html.contains("Loan Default Prediction System"));
    assert!(html.contains("submission could not be read"));
    assert!(!html.contains("Default Probability"));
}

#[tokio::test]
async fn predict_route_returns_server_error_when_scoring_fails() {
    let response = faulty_router()
        .oneshot(json_request("/api/v1/loan/predict", &scenario_form()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert!(body.get("field").is_none());
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("non-binary label 2"));
}

#[tokio::test]
async fn form_submission_shows_unavailable_message_when_scoring_fails() {
    let response = faulty_router()
        .oneshot(form_request(
            "Age=30&Income=50000&LoanAmount=20000&CreditScore=650&MonthsEmployed=12\
             &NumCreditLines=2&InterestRate=10.0&LoanTerm=36&DTIRatio=0.3&HasMortgage=No\
             &HasDependents=No&HasCoSigner=No&Education=PhD&EmploymentType=Full-time\
             &MaritalStatus=Divorced&LoanPurpose=Home",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = read_text_body(response).await;
    assert!(html.contains("prediction is temporarily unavailable"));
    assert!(!html.contains("Default Probability"));
}
