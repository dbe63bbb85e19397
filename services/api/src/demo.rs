use std::sync::Arc;

use clap::Args;
use loan_portal::applications::{
    domain::defaults, AuditStatus, FileAuditSink, HomeOwnership, LinearModelArtifact,
    LoanApplicationForm, LoanDecisionService, LoanPurpose, VerificationStatus,
};
use loan_portal::config::AppConfig;
use loan_portal::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Loan amount in dollars (minimum 1000)
    #[arg(long, default_value_t = defaults::loan_amnt())]
    loan_amnt: f64,
    /// Interest rate in percent (0 to 30)
    #[arg(long, default_value_t = defaults::int_rate())]
    int_rate: f64,
    /// Monthly installment in dollars (minimum 50)
    #[arg(long, default_value_t = defaults::installment())]
    installment: f64,
    /// Loan grade, 0 (A) through 6 (G)
    #[arg(long, default_value_t = defaults::grade())]
    grade: u8,
    /// Employment length in years (0 to 40)
    #[arg(long, default_value_t = defaults::emp_length())]
    emp_length: u8,
    /// Home ownership: RENT, OWN, MORTGAGE, or OTHER
    #[arg(long, value_parser = parse_home_ownership, default_value = "RENT")]
    home_ownership: HomeOwnership,
    /// Annual income in dollars
    #[arg(long, default_value_t = defaults::annual_inc())]
    annual_inc: f64,
    /// Verification status: Verified, "Not Verified", or "Source Verified"
    #[arg(long, value_parser = parse_verification_status, default_value = "Verified")]
    verification_status: VerificationStatus,
    /// Loan purpose, e.g. debt_consolidation, credit_card, car
    #[arg(long, value_parser = parse_purpose, default_value = "debt_consolidation")]
    purpose: LoanPurpose,
    /// Debt-to-income ratio
    #[arg(long, default_value_t = defaults::dti())]
    dti: f64,
}

fn parse_home_ownership(raw: &str) -> Result<HomeOwnership, String> {
    raw.parse()
}

fn parse_verification_status(raw: &str) -> Result<VerificationStatus, String> {
    raw.parse()
}

fn parse_purpose(raw: &str) -> Result<LoanPurpose, String> {
    raw.parse()
}

impl From<PredictArgs> for LoanApplicationForm {
    fn from(args: PredictArgs) -> Self {
        Self {
            loan_amnt: args.loan_amnt,
            int_rate: args.int_rate,
            installment: args.installment,
            grade: args.grade,
            emp_length: args.emp_length,
            home_ownership: args.home_ownership,
            annual_inc: args.annual_inc,
            verification_status: args.verification_status,
            purpose: args.purpose,
            dti: args.dti,
        }
    }
}

/// Run a single application through the same pipeline the HTTP portal
/// serves, printing the decision instead of rendering HTML.
pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let artifact = LinearModelArtifact::load(&config.model.artifact_path)?;
    let sink = FileAuditSink::new(&config.audit.log_path);
    let service = LoanDecisionService::new(config.encoding, Arc::new(artifact), Arc::new(sink));

    println!("Loan decision");
    println!("Encoding strategy: {}", config.encoding.label());

    let outcome = match service.submit(LoanApplicationForm::from(args)) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("\nSubmission rejected: {err}");
            return Ok(());
        }
    };

    println!("\nInput summary");
    for echo in &outcome.view.inputs {
        println!("- {}: {}", echo.field, echo.value);
    }

    println!(
        "\nDecision: {} (confidence {})",
        outcome.view.decision, outcome.view.confidence_display
    );
    println!(
        "Approval probability: {:.2}%",
        outcome.view.approval_probability * 100.0
    );

    match &outcome.audit {
        AuditStatus::Recorded => {
            println!("Audit: recorded to {}", config.audit.log_path.display());
        }
        AuditStatus::Failed { detail } => {
            println!("Audit: not recorded ({detail})");
        }
    }

    Ok(())
}
