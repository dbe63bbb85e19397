use super::domain::{LoanApplication, LoanApplicationForm, LoanGrade};

/// Bounds declared by the form controls. The browser enforces them via
/// widget constraints; the guard enforces them for direct API callers.
pub mod bounds {
    pub const MIN_LOAN_AMNT: f64 = 1000.0;
    pub const MIN_INT_RATE: f64 = 0.0;
    pub const MAX_INT_RATE: f64 = 30.0;
    pub const MIN_INSTALLMENT: f64 = 50.0;
    pub const MAX_EMP_LENGTH: u8 = 40;
}

/// Range violations raised by the intake guard.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("loan amount must be at least {min}, got {found}")]
    LoanAmountBelowMinimum { min: f64, found: f64 },
    #[error("interest rate must be between {min} and {max} percent, got {found}")]
    InterestRateOutOfRange { min: f64, max: f64, found: f64 },
    #[error("monthly installment must be at least {min}, got {found}")]
    InstallmentBelowMinimum { min: f64, found: f64 },
    #[error("loan grade must be between 0 (A) and {max} (G), got {found}")]
    GradeOutOfRange { max: u8, found: u8 },
    #[error("employment length must be at most {max} years, got {found}")]
    EmploymentLengthOutOfRange { max: u8, found: u8 },
    #[error("annual income cannot be negative, got {found}")]
    NegativeAnnualIncome { found: f64 },
    #[error("debt-to-income ratio cannot be negative, got {found}")]
    NegativeDti { found: f64 },
    #[error("{field} must be a finite number")]
    NonFiniteNumber { field: &'static str },
}

/// Stateless validator turning raw form submissions into the domain
/// type. Nothing downstream of the guard ever sees an out-of-range
/// field.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn application_from_form(
        &self,
        form: LoanApplicationForm,
    ) -> Result<LoanApplication, IntakeViolation> {
        for (field, value) in [
            ("loan_amnt", form.loan_amnt),
            ("int_rate", form.int_rate),
            ("installment", form.installment),
            ("annual_inc", form.annual_inc),
            ("dti", form.dti),
        ] {
            if !value.is_finite() {
                return Err(IntakeViolation::NonFiniteNumber { field });
            }
        }

        if form.loan_amnt < bounds::MIN_LOAN_AMNT {
            return Err(IntakeViolation::LoanAmountBelowMinimum {
                min: bounds::MIN_LOAN_AMNT,
                found: form.loan_amnt,
            });
        }

        if !(bounds::MIN_INT_RATE..=bounds::MAX_INT_RATE).contains(&form.int_rate) {
            return Err(IntakeViolation::InterestRateOutOfRange {
                min: bounds::MIN_INT_RATE,
                max: bounds::MAX_INT_RATE,
                found: form.int_rate,
            });
        }

        if form.installment < bounds::MIN_INSTALLMENT {
            return Err(IntakeViolation::InstallmentBelowMinimum {
                min: bounds::MIN_INSTALLMENT,
                found: form.installment,
            });
        }

        let grade = LoanGrade::new(form.grade).ok_or(IntakeViolation::GradeOutOfRange {
            max: LoanGrade::MAX,
            found: form.grade,
        })?;

        if form.emp_length > bounds::MAX_EMP_LENGTH {
            return Err(IntakeViolation::EmploymentLengthOutOfRange {
                max: bounds::MAX_EMP_LENGTH,
                found: form.emp_length,
            });
        }

        if form.annual_inc < 0.0 {
            return Err(IntakeViolation::NegativeAnnualIncome {
                found: form.annual_inc,
            });
        }

        if form.dti < 0.0 {
            return Err(IntakeViolation::NegativeDti { found: form.dti });
        }

        Ok(LoanApplication {
            loan_amnt: form.loan_amnt,
            int_rate: form.int_rate,
            installment: form.installment,
            grade,
            emp_length: form.emp_length,
            home_ownership: form.home_ownership,
            annual_inc: form.annual_inc,
            verification_status: form.verification_status,
            purpose: form.purpose,
            dti: form.dti,
        })
    }
}
