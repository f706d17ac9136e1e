use std::str::FromStr;

use super::domain::{
    ApplicantForm, ApplicantRecord, Education, EmploymentType, LoanPurpose, LoanTerm,
    MaritalStatus, YesNo,
};

/// Validation errors raised while turning a form into an [`ApplicantRecord`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error("{field} has value '{value}' outside its allowed categories")]
    InvalidCategory { field: &'static str, value: String },
    #[error("{field} must be between {min} and {max} (found {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// The submission could not be read into an [`ApplicantForm`] at all.
    #[error("submission could not be read: {detail}")]
    Unreadable {
        field: Option<&'static str>,
        detail: String,
    },
}

impl IntakeError {
    /// Build an `Unreadable` error from a body parser message, naming the
    /// offending field when the message carries its path.
    pub fn unreadable(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let field = FORM_FIELDS
            .iter()
            .copied()
            .find(|name| detail.contains(&format!("{name}: ")));
        IntakeError::Unreadable { field, detail }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            IntakeError::InvalidCategory { field, .. } | IntakeError::OutOfRange { field, .. } => {
                Some(field)
            }
            IntakeError::Unreadable { field, .. } => *field,
        }
    }
}

/// Submission keys in form order.
pub const FORM_FIELDS: [&str; 16] = [
    "Age",
    "Income",
    "LoanAmount",
    "CreditScore",
    "MonthsEmployed",
    "NumCreditLines",
    "InterestRate",
    "LoanTerm",
    "DTIRatio",
    "HasMortgage",
    "HasDependents",
    "HasCoSigner",
    "Education",
    "EmploymentType",
    "MaritalStatus",
    "LoanPurpose",
];

/// Inclusive bounds of a numeric input, mirroring the form widget limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    const fn new(field: &'static str, min: f64, max: f64) -> Self {
        Self { field, min, max }
    }

    /// Range-check a whole-number input and narrow it for the record.
    fn whole(&self, value: i64) -> Result<u32, IntakeError> {
        self.check(value as f64)?;
        u32::try_from(value).map_err(|_| self.violation(value as f64))
    }

    fn check(&self, value: f64) -> Result<(), IntakeError> {
        if value.is_finite() && value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(self.violation(value))
        }
    }

    fn violation(&self, value: f64) -> IntakeError {
        IntakeError::OutOfRange {
            field: self.field,
            value,
            min: self.min,
            max: self.max,
        }
    }
}

pub const AGE: FieldRange = FieldRange::new("Age", 18.0, 100.0);
pub const INCOME: FieldRange = FieldRange::new("Income", 0.0, 1_000_000.0);
pub const LOAN_AMOUNT: FieldRange = FieldRange::new("LoanAmount", 0.0, 500_000.0);
pub const CREDIT_SCORE: FieldRange = FieldRange::new("CreditScore", 300.0, 850.0);
pub const MONTHS_EMPLOYED: FieldRange = FieldRange::new("MonthsEmployed", 0.0, 500.0);
pub const NUM_CREDIT_LINES: FieldRange = FieldRange::new("NumCreditLines", 0.0, 20.0);
pub const INTEREST_RATE: FieldRange = FieldRange::new("InterestRate", 0.0, 50.0);
pub const DTI_RATIO: FieldRange = FieldRange::new("DTIRatio", 0.0, 1.0);

fn category<T: FromStr>(field: &'static str, value: &str) -> Result<T, IntakeError> {
    value.parse::<T>().map_err(|_| IntakeError::InvalidCategory {
        field,
        value: value.to_string(),
    })
}

/// Stateless guard at the input boundary; the encoder only ever sees its output.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Validate a raw form, reporting the first violation in form order.
    pub fn record_from_form(&self, form: &ApplicantForm) -> Result<ApplicantRecord, IntakeError> {
        let age = AGE.whole(form.age)?;
        let income = INCOME.whole(form.income)?;
        let loan_amount = LOAN_AMOUNT.whole(form.loan_amount)?;
        let credit_score = CREDIT_SCORE.whole(form.credit_score)?;
        let months_employed = MONTHS_EMPLOYED.whole(form.months_employed)?;
        let num_credit_lines = NUM_CREDIT_LINES.whole(form.num_credit_lines)?;
        INTEREST_RATE.check(form.interest_rate)?;

        let loan_term = u32::try_from(form.loan_term)
            .ok()
            .and_then(LoanTerm::from_months)
            .ok_or_else(|| IntakeError::InvalidCategory {
                field: "LoanTerm",
                value: form.loan_term.to_string(),
            })?;

        DTI_RATIO.check(form.dti_ratio)?;

        Ok(ApplicantRecord {
            age,
            income,
            loan_amount,
            credit_score,
            months_employed,
            num_credit_lines,
            interest_rate: form.interest_rate,
            loan_term,
            dti_ratio: form.dti_ratio,
            has_mortgage: category::<YesNo>("HasMortgage", &form.has_mortgage)?,
            has_dependents: category::<YesNo>("HasDependents", &form.has_dependents)?,
            has_co_signer: category::<YesNo>("HasCoSigner", &form.has_co_signer)?,
            education: category::<Education>("Education", &form.education)?,
            employment_type: category::<EmploymentType>("EmploymentType", &form.employment_type)?,
            marital_status: category::<MaritalStatus>("MaritalStatus", &form.marital_status)?,
            loan_purpose: category::<LoanPurpose>("LoanPurpose", &form.loan_purpose)?,
        })
    }
}
