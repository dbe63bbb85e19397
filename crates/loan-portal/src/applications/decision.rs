use serde::Serialize;

use super::domain::LoanApplication;
use super::model::PredictionResult;

pub const APPROVED_LABEL: &str = "Approved";
pub const REJECTED_LABEL: &str = "Rejected";

/// Decision label for a classifier output: 1 approves, everything else
/// rejects. There is no third state.
pub fn decision_label(label: u8) -> &'static str {
    if label == 1 {
        APPROVED_LABEL
    } else {
        REJECTED_LABEL
    }
}

/// Two-decimal percentage, e.g. `0.8` renders as `80.00%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Presentation transform over one prediction: the decision label, the
/// side-adjusted confidence, and an echo of every submitted field. No
/// computation beyond formatting happens here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionView {
    pub decision: &'static str,
    /// Probability of the rendered decision: the approval probability
    /// when approved, its complement when rejected.
    pub confidence: f64,
    pub confidence_display: String,
    pub approval_probability: f64,
    pub inputs: Vec<FieldEcho>,
}

/// One echoed form field, labeled as submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEcho {
    pub field: &'static str,
    pub value: String,
}

impl DecisionView {
    pub fn new(application: &LoanApplication, result: &PredictionResult) -> Self {
        let confidence = if result.approved() {
            result.probability
        } else {
            1.0 - result.probability
        };

        let inputs = application
            .field_values()
            .into_iter()
            .map(|(field, value)| FieldEcho { field, value })
            .collect();

        Self {
            decision: decision_label(result.label),
            confidence,
            confidence_display: format_percent(confidence),
            approval_probability: result.probability,
            inputs,
        }
    }
}
