use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::audit::AuditSink;
use super::decision::DecisionView;
use super::domain::LoanApplicationForm;
use super::model::Classifier;
use super::pages;
use super::service::{
    ApplicationServiceError, AuditStatus, LoanDecisionService, SubmissionOutcome,
};

/// Router builder exposing the portal form, the form submit action, and
/// the JSON decision endpoint.
pub fn portal_router<C, A>(service: Arc<LoanDecisionService<C, A>>) -> Router
where
    C: Classifier + 'static,
    A: AuditSink + 'static,
{
    Router::new()
        .route("/", get(form_page))
        .route("/submit", post(submit_form_handler::<C, A>))
        .route("/api/v1/loans/decisions", post(decision_api_handler::<C, A>))
        .with_state(service)
}

/// JSON body returned by the decision API.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    #[serde(flatten)]
    pub view: DecisionView,
    pub audit: AuditStatus,
}

impl From<SubmissionOutcome> for DecisionResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            view: outcome.view,
            audit: outcome.audit,
        }
    }
}

pub(crate) async fn form_page() -> Html<String> {
    Html(pages::render_form())
}

pub(crate) async fn submit_form_handler<C, A>(
    State(service): State<Arc<LoanDecisionService<C, A>>>,
    Form(form): Form<LoanApplicationForm>,
) -> Response
where
    C: Classifier + 'static,
    A: AuditSink + 'static,
{
    match service.submit(form) {
        Ok(outcome) => Html(pages::render_decision(&outcome)).into_response(),
        Err(ApplicationServiceError::Intake(violation)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(pages::render_intake_rejection(&violation)),
        )
            .into_response(),
    }
}

pub(crate) async fn decision_api_handler<C, A>(
    State(service): State<Arc<LoanDecisionService<C, A>>>,
    Json(form): Json<LoanApplicationForm>,
) -> Response
where
    C: Classifier + 'static,
    A: AuditSink + 'static,
{
    match service.submit(form) {
        Ok(outcome) => (StatusCode::OK, Json(DecisionResponse::from(outcome))).into_response(),
        Err(ApplicationServiceError::Intake(violation)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": violation.to_string() })),
        )
            .into_response(),
    }
}
