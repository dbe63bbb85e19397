use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::decision::{decision_label, format_percent};
use super::domain::{LoanApplication, FEATURE_COUNT};
use super::model::PredictionResult;

/// One request's plaintext audit entry: timestamp, verbatim inputs,
/// decision label, and approval probability.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub timestamp: NaiveDateTime,
    pub fields: [(&'static str, String); FEATURE_COUNT],
    pub decision: &'static str,
    pub approval_probability: f64,
}

impl AuditRecord {
    pub fn new(
        application: &LoanApplication,
        result: &PredictionResult,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            timestamp,
            fields: application.field_values(),
            decision: decision_label(result.label),
            approval_probability: result.probability,
        }
    }

    /// Fixed text template appended to the log. The probability line
    /// always carries the approval probability, regardless of which
    /// side the decision landed on.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "LOAN PREDICTION – {}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str("----------------------------\n");
        out.push_str("Input Summary:\n");
        for (field, value) in &self.fields {
            out.push_str(&format!("  {field}: {value}\n"));
        }
        out.push('\n');
        out.push_str("Prediction Result:\n");
        out.push_str(&format!("  Decision: {}\n", self.decision));
        out.push_str(&format!(
            "  Approval Probability: {}\n",
            format_percent(self.approval_probability)
        ));
        out.push_str("----------------------------\n");
        out
    }
}

/// Failure appending an audit record. Callers treat this as
/// best-effort: the decision already rendered is never rolled back.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("unable to append to audit log {path}: {source}")]
    Append {
        path: String,
        source: std::io::Error,
    },
}

/// Append-only destination for audit records.
pub trait AuditSink: Send + Sync {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// Sink writing to a shared, unbounded, never-rotated text file. The
/// file is created on first append. Concurrent writers are not
/// coordinated; interleaving across sessions is a documented
/// limitation of the log format.
#[derive(Debug, Clone)]
pub struct FileAuditSink {
    path: PathBuf,
}

impl FileAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditSink {
    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(record.render().as_bytes()))
            .map_err(|source| AuditError::Append {
                path: self.path.display().to_string(),
                source,
            })
    }
}
