use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::warn;

use super::audit::{AuditRecord, AuditSink};
use super::decision::DecisionView;
use super::domain::{LoanApplication, LoanApplicationForm};
use super::encoding::{CategoryEncoder, EncodingStrategy};
use super::intake::{IntakeGuard, IntakeViolation};
use super::model::{Classifier, PredictionResult};

/// Outcome of the audit phase, surfaced alongside the rendered
/// decision instead of failing the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditStatus {
    Recorded,
    Failed { detail: String },
}

impl AuditStatus {
    pub fn recorded(&self) -> bool {
        matches!(self, AuditStatus::Recorded)
    }
}

/// Everything one submission produced: the validated application, the
/// raw prediction, its presentation, and the audit status.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub application: LoanApplication,
    pub result: PredictionResult,
    pub view: DecisionView,
    pub audit: AuditStatus,
}

/// Error raised by the submission pipeline. Only intake can fail;
/// classification is infallible once the row is validated, and audit
/// failures are downgraded to a status.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
}

/// Service composing the intake guard, encoder, classifier, and audit
/// sink. Handles one submission per call, synchronously: there is no
/// suspension point between encode, classify, and append.
pub struct LoanDecisionService<C, A> {
    guard: IntakeGuard,
    encoder: CategoryEncoder,
    classifier: Arc<C>,
    audit: Arc<A>,
}

impl<C, A> LoanDecisionService<C, A>
where
    C: Classifier + 'static,
    A: AuditSink + 'static,
{
    pub fn new(encoding: EncodingStrategy, classifier: Arc<C>, audit: Arc<A>) -> Self {
        Self {
            guard: IntakeGuard,
            encoder: CategoryEncoder::new(encoding),
            classifier,
            audit,
        }
    }

    pub fn encoding(&self) -> EncodingStrategy {
        self.encoder.strategy()
    }

    /// Run one submission through the full pipeline.
    ///
    /// Phase 1 (validate, encode, classify, build the view) either
    /// fails on intake or completes; phase 2 (the audit append) is
    /// best-effort and can only downgrade the outcome's audit status.
    pub fn submit(
        &self,
        form: LoanApplicationForm,
    ) -> Result<SubmissionOutcome, ApplicationServiceError> {
        let application = self.guard.application_from_form(form)?;
        let features = self.encoder.encode(&application);
        let result = PredictionResult::from_classifier(self.classifier.as_ref(), &features);
        let view = DecisionView::new(&application, &result);

        let record = AuditRecord::new(&application, &result, Local::now().naive_local());
        let audit = match self.audit.append(&record) {
            Ok(()) => AuditStatus::Recorded,
            Err(error) => {
                warn!(%error, decision = view.decision, "audit append failed after decision");
                AuditStatus::Failed {
                    detail: error.to_string(),
                }
            }
        };

        Ok(SubmissionOutcome {
            application,
            result,
            view,
            audit,
        })
    }
}
