use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raw submission as collected by the form, the JSON API or the CLI.
///
/// Categorical fields stay as strings here; `IntakeGuard` turns them into an
/// [`ApplicantRecord`] or rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantForm {
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Income")]
    pub income: i64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: i64,
    #[serde(rename = "CreditScore")]
    pub credit_score: i64,
    #[serde(rename = "MonthsEmployed")]
    pub months_employed: i64,
    #[serde(rename = "NumCreditLines")]
    pub num_credit_lines: i64,
    #[serde(rename = "InterestRate")]
    pub interest_rate: f64,
    #[serde(rename = "LoanTerm")]
    pub loan_term: i64,
    #[serde(rename = "DTIRatio")]
    pub dti_ratio: f64,
    #[serde(rename = "HasMortgage")]
    pub has_mortgage: String,
    #[serde(rename = "HasDependents")]
    pub has_dependents: String,
    #[serde(rename = "HasCoSigner")]
    pub has_co_signer: String,
    #[serde(rename = "Education")]
    pub education: String,
    #[serde(rename = "EmploymentType")]
    pub employment_type: String,
    #[serde(rename = "MaritalStatus")]
    pub marital_status: String,
    #[serde(rename = "LoanPurpose")]
    pub loan_purpose: String,
}

impl Default for ApplicantForm {
    /// Initial widget values of the intake form.
    fn default() -> Self {
        Self {
            age: 30,
            income: 50_000,
            loan_amount: 20_000,
            credit_score: 650,
            months_employed: 12,
            num_credit_lines: 2,
            interest_rate: 10.0,
            loan_term: i64::from(LoanTerm::Months12.months()),
            dti_ratio: 0.3,
            has_mortgage: YesNo::No.label().to_string(),
            has_dependents: YesNo::No.label().to_string(),
            has_co_signer: YesNo::No.label().to_string(),
            education: Education::HighSchool.label().to_string(),
            employment_type: EmploymentType::FullTime.label().to_string(),
            marital_status: MaritalStatus::Divorced.label().to_string(),
            loan_purpose: LoanPurpose::Business.label().to_string(),
        }
    }
}

/// Validated applicant snapshot; every categorical value is inside its vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplicantRecord {
    pub age: u32,
    pub income: u32,
    pub loan_amount: u32,
    pub credit_score: u32,
    pub months_employed: u32,
    pub num_credit_lines: u32,
    pub interest_rate: f64,
    pub loan_term: LoanTerm,
    pub dti_ratio: f64,
    pub has_mortgage: YesNo,
    pub has_dependents: YesNo,
    pub has_co_signer: YesNo,
    pub education: Education,
    pub employment_type: EmploymentType,
    pub marital_status: MaritalStatus,
    pub loan_purpose: LoanPurpose,
}

impl From<&ApplicantRecord> for ApplicantForm {
    fn from(record: &ApplicantRecord) -> Self {
        Self {
            age: i64::from(record.age),
            income: i64::from(record.income),
            loan_amount: i64::from(record.loan_amount),
            credit_score: i64::from(record.credit_score),
            months_employed: i64::from(record.months_employed),
            num_credit_lines: i64::from(record.num_credit_lines),
            interest_rate: record.interest_rate,
            loan_term: i64::from(record.loan_term.months()),
            dti_ratio: record.dti_ratio,
            has_mortgage: record.has_mortgage.label().to_string(),
            has_dependents: record.has_dependents.label().to_string(),
            has_co_signer: record.has_co_signer.label().to_string(),
            education: record.education.label().to_string(),
            employment_type: record.employment_type.label().to_string(),
            marital_status: record.marital_status.label().to_string(),
            loan_purpose: record.loan_purpose.label().to_string(),
        }
    }
}

/// Returned by the `FromStr` impls below when a string is outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

/// Implements `ordered`, `label` and exact-label parsing for a vocabulary enum.
macro_rules! vocabulary {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const fn ordered() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::ordered()
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label() == value)
                    .ok_or_else(|| UnknownCategory(value.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

/// Yes/No answers, encoded as 1/0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNo {
    No,
    Yes,
}

vocabulary!(YesNo { No => "No", Yes => "Yes" });

impl YesNo {
    pub const fn indicator(self) -> f64 {
        match self {
            Self::Yes => 1.0,
            Self::No => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Education {
    HighSchool,
    Bachelors,
    Masters,
    Phd,
}

vocabulary!(Education {
    HighSchool => "High School",
    Bachelors => "Bachelor's",
    Masters => "Master's",
    Phd => "PhD",
});

/// Full-time is the reference category: it has no indicator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmploymentType {
    FullTime,
    PartTime,
    SelfEmployed,
    Unemployed,
}

vocabulary!(EmploymentType {
    FullTime => "Full-time",
    PartTime => "Part-time",
    SelfEmployed => "Self-employed",
    Unemployed => "Unemployed",
});

/// Divorced is the reference category: it has no indicator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaritalStatus {
    Divorced,
    Married,
    Single,
}

vocabulary!(MaritalStatus {
    Divorced => "Divorced",
    Married => "Married",
    Single => "Single",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoanPurpose {
    Business,
    Education,
    Home,
    Other,
}

vocabulary!(LoanPurpose {
    Business => "Business",
    Education => "Education",
    Home => "Home",
    Other => "Other",
});

/// Loan terms offered by the product, in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoanTerm {
    Months12,
    Months24,
    Months36,
    Months48,
    Months60,
}

impl LoanTerm {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Months12,
            Self::Months24,
            Self::Months36,
            Self::Months48,
            Self::Months60,
        ]
    }

    pub const fn months(self) -> u32 {
        match self {
            Self::Months12 => 12,
            Self::Months24 => 24,
            Self::Months36 => 36,
            Self::Months48 => 48,
            Self::Months60 => 60,
        }
    }

    pub fn from_months(months: u32) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|term| term.months() == months)
    }
}
