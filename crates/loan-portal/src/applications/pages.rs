//! HTML rendering for the portal form and the decision page. All field
//! values are typed numbers or closed enum labels, so no user-supplied
//! free text ever reaches the markup.

use super::domain::{defaults, HomeOwnership, LoanGrade, LoanPurpose, VerificationStatus};
use super::intake::{bounds, IntakeViolation};
use super::service::{AuditStatus, SubmissionOutcome};

const STYLE: &str = "\
body { font-family: sans-serif; background: #f2f4f8; margin: 0; }\n\
main { max-width: 680px; margin: 2rem auto; background: #fff; padding: 2rem; \
border-radius: 10px; box-shadow: 0 0 15px rgba(0,0,0,0.1); }\n\
label { display: block; margin-top: 0.75rem; font-weight: 600; }\n\
input, select { width: 100%; padding: 0.4rem; margin-top: 0.25rem; }\n\
button { margin-top: 1.5rem; padding: 0.6rem 1.4rem; }\n\
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }\n\
td, th { border: 1px solid #d0d4da; padding: 0.4rem 0.6rem; text-align: left; }\n\
.approved { color: #1d7a33; }\n\
.rejected { color: #a32020; }\n\
.audit-warning { background: #fff3cd; border: 1px solid #e0c36a; \
padding: 0.6rem; margin-top: 1rem; border-radius: 6px; }\n";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n\
<main>\n{body}</main>\n</body>\n</html>\n"
    )
}

fn number_input(
    name: &str,
    label: &str,
    min: f64,
    max: Option<f64>,
    step: f64,
    value: f64,
) -> String {
    let max_attr = max.map(|max| format!(" max=\"{max}\"")).unwrap_or_default();
    format!(
        "<label for=\"{name}\">{label}</label>\n\
<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\"{max_attr} \
step=\"{step}\" value=\"{value}\" required>\n"
    )
}

fn select<T: Copy + PartialEq>(
    name: &str,
    label: &str,
    options: &[T],
    selected: T,
    value_of: impl Fn(T) -> String,
    text_of: impl Fn(T) -> String,
) -> String {
    let mut out = format!(
        "<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n"
    );
    for &option in options {
        let marker = if option == selected { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{}\"{marker}>{}</option>\n",
            value_of(option),
            text_of(option)
        ));
    }
    out.push_str("</select>\n");
    out
}

/// The application form: ten controls with the declared bounds and
/// defaults, one submit action.
pub fn render_form() -> String {
    let grades: Vec<u8> = (0..=LoanGrade::MAX).collect();
    let mut body = String::from(
        "<h1>Loan Approval Application</h1>\n<p>Fill in the applicant's loan details \
below for an instant eligibility decision.</p>\n<form method=\"post\" action=\"/submit\">\n",
    );

    body.push_str(&number_input(
        "loan_amnt",
        "Loan Amount ($)",
        bounds::MIN_LOAN_AMNT,
        None,
        500.0,
        defaults::loan_amnt(),
    ));
    body.push_str(&number_input(
        "int_rate",
        "Interest Rate (%)",
        bounds::MIN_INT_RATE,
        Some(bounds::MAX_INT_RATE),
        0.1,
        defaults::int_rate(),
    ));
    body.push_str(&number_input(
        "installment",
        "Monthly Installment ($)",
        bounds::MIN_INSTALLMENT,
        None,
        10.0,
        defaults::installment(),
    ));
    body.push_str(&select(
        "grade",
        "Loan Grade",
        &grades,
        defaults::grade(),
        |grade| grade.to_string(),
        |grade| {
            LoanGrade::new(grade)
                .map(|grade| grade.letter().to_string())
                .unwrap_or_default()
        },
    ));
    body.push_str(&format!(
        "<label for=\"emp_length\">Employment Length (years)</label>\n\
<input type=\"range\" id=\"emp_length\" name=\"emp_length\" min=\"0\" \
max=\"{}\" value=\"{}\">\n",
        bounds::MAX_EMP_LENGTH,
        defaults::emp_length(),
    ));
    body.push_str(&number_input(
        "annual_inc",
        "Annual Income ($)",
        0.0,
        None,
        1000.0,
        defaults::annual_inc(),
    ));
    body.push_str(&select(
        "home_ownership",
        "Home Ownership",
        &HomeOwnership::ALL,
        defaults::home_ownership(),
        |value| value.label().to_string(),
        |value| value.label().to_string(),
    ));
    body.push_str(&select(
        "verification_status",
        "Verification Status",
        &VerificationStatus::ALL,
        defaults::verification_status(),
        |value| value.label().to_string(),
        |value| value.label().to_string(),
    ));
    body.push_str(&select(
        "purpose",
        "Loan Purpose",
        &LoanPurpose::ALL,
        defaults::purpose(),
        |value| value.label().to_string(),
        |value| value.label().to_string(),
    ));
    body.push_str(&number_input(
        "dti",
        "Debt-to-Income Ratio",
        0.0,
        None,
        0.1,
        defaults::dti(),
    ));

    body.push_str("<button type=\"submit\">Submit for Review</button>\n</form>\n");
    page("Loan Approval Portal", &body)
}

/// The decision page: echoed inputs, the decision, the confidence, and
/// an audit warning when the log append failed.
pub fn render_decision(outcome: &SubmissionOutcome) -> String {
    let view = &outcome.view;
    let mut body =
        String::from("<h1>Review Summary</h1>\n<table>\n<tr><th>Field</th><th>Value</th></tr>\n");
    for echo in &view.inputs {
        let value = if echo.field == "grade" {
            format!("{} ({})", outcome.application.grade.letter(), echo.value)
        } else {
            echo.value.clone()
        };
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            echo.field, value
        ));
    }
    body.push_str("</table>\n");

    let class = if view.decision == "Approved" {
        "approved"
    } else {
        "rejected"
    };
    body.push_str(&format!(
        "<h2>Decision</h2>\n<p class=\"{class}\">The loan application is \
<strong>{}</strong>.</p>\n<p>Confidence: <strong>{}</strong></p>\n",
        view.decision.to_lowercase(),
        view.confidence_display,
    ));

    if let AuditStatus::Failed { detail } = &outcome.audit {
        body.push_str(&format!(
            "<div class=\"audit-warning\">The decision above was not written \
to the audit log: {detail}</div>\n"
        ));
    }

    body.push_str("<p><a href=\"/\">Submit another application</a></p>\n");
    page("Loan Decision", &body)
}

/// A 422 page for submissions the intake guard rejected.
pub fn render_intake_rejection(violation: &IntakeViolation) -> String {
    let body = format!(
        "<h1>Submission Not Accepted</h1>\n<p>{violation}</p>\n\
<p><a href=\"/\">Back to the application form</a></p>\n"
    );
    page("Submission Not Accepted", &body)
}
