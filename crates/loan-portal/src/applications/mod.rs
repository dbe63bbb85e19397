//! Loan application intake, encoding, classification, and audit.
//!
//! One submission flows intake guard -> category encoder -> classifier
//! -> decision view, with the audit sink appending a plaintext record
//! after classification as a best-effort side effect.

pub mod audit;
pub mod decision;
pub mod domain;
pub mod encoding;
pub mod intake;
pub mod model;
pub mod pages;
pub mod router;
pub mod service;

pub use audit::{AuditError, AuditRecord, AuditSink, FileAuditSink};
pub use decision::{DecisionView, FieldEcho};
pub use domain::{
    HomeOwnership, LoanApplication, LoanApplicationForm, LoanGrade, LoanPurpose,
    VerificationStatus, FEATURE_COLUMNS, FEATURE_COUNT,
};
pub use encoding::{CategoryEncoder, EncodingStrategy, FeatureVector};
pub use intake::{IntakeGuard, IntakeViolation};
pub use model::{Classifier, LinearModelArtifact, ModelLoadError, PredictionResult};
pub use router::portal_router;
pub use service::{
    ApplicationServiceError, AuditStatus, LoanDecisionService, SubmissionOutcome,
};
