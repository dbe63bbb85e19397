use serde::{Deserialize, Serialize};

/// Column order the deployed classifier artifact was trained on. The
/// three categorical columns carry integer codes after encoding.
pub const FEATURE_COLUMNS: [&str; 10] = [
    "loan_amnt",
    "int_rate",
    "installment",
    "grade",
    "emp_length",
    "home_ownership",
    "annual_inc",
    "verification_status",
    "purpose",
    "dti",
];

/// Number of columns in an encoded application row.
pub const FEATURE_COUNT: usize = FEATURE_COLUMNS.len();

/// Housing situation disclosed by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HomeOwnership {
    Rent,
    Own,
    Mortgage,
    Other,
}

impl HomeOwnership {
    /// Every accepted value, in the order the form presents them.
    pub const ALL: [Self; 4] = [Self::Rent, Self::Own, Self::Mortgage, Self::Other];

    pub const fn label(self) -> &'static str {
        match self {
            HomeOwnership::Rent => "RENT",
            HomeOwnership::Own => "OWN",
            HomeOwnership::Mortgage => "MORTGAGE",
            HomeOwnership::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for HomeOwnership {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.label().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| format!("unknown home ownership '{raw}'"))
    }
}

/// Income verification state reported by the underwriting feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Verified,
    #[serde(rename = "Not Verified")]
    NotVerified,
    #[serde(rename = "Source Verified")]
    SourceVerified,
}

impl VerificationStatus {
    /// Every accepted value, in the order the form presents them.
    pub const ALL: [Self; 3] = [Self::Verified, Self::NotVerified, Self::SourceVerified];

    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Verified => "Verified",
            VerificationStatus::NotVerified => "Not Verified",
            VerificationStatus::SourceVerified => "Source Verified",
        }
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.label().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| format!("unknown verification status '{raw}'"))
    }
}

/// Stated purpose of the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanPurpose {
    DebtConsolidation,
    CreditCard,
    HomeImprovement,
    MajorPurchase,
    SmallBusiness,
    Car,
    Other,
}

impl LoanPurpose {
    /// Every accepted value, in the order the form presents them.
    pub const ALL: [Self; 7] = [
        Self::DebtConsolidation,
        Self::CreditCard,
        Self::HomeImprovement,
        Self::MajorPurchase,
        Self::SmallBusiness,
        Self::Car,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LoanPurpose::DebtConsolidation => "debt_consolidation",
            LoanPurpose::CreditCard => "credit_card",
            LoanPurpose::HomeImprovement => "home_improvement",
            LoanPurpose::MajorPurchase => "major_purchase",
            LoanPurpose::SmallBusiness => "small_business",
            LoanPurpose::Car => "car",
            LoanPurpose::Other => "other",
        }
    }
}

impl std::str::FromStr for LoanPurpose {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.label().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| format!("unknown loan purpose '{raw}'"))
    }
}

/// Internal risk grade, 0 through 6, displayed to applicants as A-G.
/// Only the intake guard constructs one, so a value above 6 cannot
/// reach the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanGrade(u8);

impl LoanGrade {
    pub const MAX: u8 = 6;

    /// Build a grade from its numeric form; values above 6 are rejected.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Letter shown on the form: 0 is A, 6 is G.
    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }
}

/// Raw submission as posted by the form or the JSON API. Every field
/// carries the default the form pre-fills, so an untouched form is
/// always submittable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplicationForm {
    #[serde(default = "defaults::loan_amnt")]
    pub loan_amnt: f64,
    #[serde(default = "defaults::int_rate")]
    pub int_rate: f64,
    #[serde(default = "defaults::installment")]
    pub installment: f64,
    #[serde(default = "defaults::grade")]
    pub grade: u8,
    #[serde(default = "defaults::emp_length")]
    pub emp_length: u8,
    #[serde(default = "defaults::home_ownership")]
    pub home_ownership: HomeOwnership,
    #[serde(default = "defaults::annual_inc")]
    pub annual_inc: f64,
    #[serde(default = "defaults::verification_status")]
    pub verification_status: VerificationStatus,
    #[serde(default = "defaults::purpose")]
    pub purpose: LoanPurpose,
    #[serde(default = "defaults::dti")]
    pub dti: f64,
}

impl Default for LoanApplicationForm {
    fn default() -> Self {
        Self {
            loan_amnt: defaults::loan_amnt(),
            int_rate: defaults::int_rate(),
            installment: defaults::installment(),
            grade: defaults::grade(),
            emp_length: defaults::emp_length(),
            home_ownership: defaults::home_ownership(),
            annual_inc: defaults::annual_inc(),
            verification_status: defaults::verification_status(),
            purpose: defaults::purpose(),
            dti: defaults::dti(),
        }
    }
}

/// Form defaults, matching the pre-filled values of each input control.
pub mod defaults {
    use super::{HomeOwnership, LoanPurpose, VerificationStatus};

    pub fn loan_amnt() -> f64 {
        1000.0
    }

    pub fn int_rate() -> f64 {
        0.0
    }

    pub fn installment() -> f64 {
        50.0
    }

    pub fn grade() -> u8 {
        0
    }

    pub fn emp_length() -> u8 {
        5
    }

    pub fn home_ownership() -> HomeOwnership {
        HomeOwnership::Rent
    }

    pub fn annual_inc() -> f64 {
        0.0
    }

    pub fn verification_status() -> VerificationStatus {
        VerificationStatus::Verified
    }

    pub fn purpose() -> LoanPurpose {
        LoanPurpose::DebtConsolidation
    }

    pub fn dti() -> f64 {
        0.0
    }
}

/// Validated application, produced by the intake guard. Lives for a
/// single request; never persisted as structured data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanApplication {
    pub loan_amnt: f64,
    pub int_rate: f64,
    pub installment: f64,
    pub grade: LoanGrade,
    pub emp_length: u8,
    pub home_ownership: HomeOwnership,
    pub annual_inc: f64,
    pub verification_status: VerificationStatus,
    pub purpose: LoanPurpose,
    pub dti: f64,
}

impl LoanApplication {
    /// Raw field values in artifact column order, as written to the
    /// audit log and echoed back to the applicant.
    pub fn field_values(&self) -> [(&'static str, String); FEATURE_COUNT] {
        [
            ("loan_amnt", display_number(self.loan_amnt)),
            ("int_rate", display_number(self.int_rate)),
            ("installment", display_number(self.installment)),
            ("grade", self.grade.value().to_string()),
            ("emp_length", self.emp_length.to_string()),
            ("home_ownership", self.home_ownership.label().to_string()),
            ("annual_inc", display_number(self.annual_inc)),
            (
                "verification_status",
                self.verification_status.label().to_string(),
            ),
            ("purpose", self.purpose.label().to_string()),
            ("dti", display_number(self.dti)),
        ]
    }
}

// Whole-valued amounts print without a trailing ".0"; fractional
// amounts keep their full precision.
fn display_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
