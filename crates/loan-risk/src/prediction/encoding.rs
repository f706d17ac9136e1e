//! Fixed-layout feature encoding for the default-risk classifier.
//!
//! The column order below is the order the classifier was trained on. Scoring
//! compares it against the artifact's `feature_names`, so any edit here must be
//! matched by a retrained artifact.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::domain::{
    ApplicantForm, ApplicantRecord, Education, EmploymentType, LoanPurpose, MaritalStatus,
};
use super::intake::{IntakeError, IntakeGuard};

pub const FEATURE_COUNT: usize = 25;

/// Trained column names, in model order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
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
    "Education_Bachelor's",
    "Education_High School",
    "Education_Master's",
    "Education_PhD",
    "EmploymentType_Part-time",
    "EmploymentType_Self-employed",
    "EmploymentType_Unemployed",
    "Marital_Married",
    "Marital_Single",
    "Purpose_Business",
    "Purpose_Education",
    "Purpose_Home",
    "Purpose_Other",
];

/// Number of leading columns copied from the record rather than one-hot encoded.
pub const BASE_FEATURE_COUNT: usize = 12;

/// Column group of a categorical field. `reference` has no indicator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorGroup {
    pub field: &'static str,
    pub columns: &'static [&'static str],
    pub reference: Option<&'static str>,
}

pub const EDUCATION_GROUP: IndicatorGroup = IndicatorGroup {
    field: "Education",
    columns: &[
        "Education_Bachelor's",
        "Education_High School",
        "Education_Master's",
        "Education_PhD",
    ],
    reference: None,
};

pub const EMPLOYMENT_GROUP: IndicatorGroup = IndicatorGroup {
    field: "EmploymentType",
    columns: &[
        "EmploymentType_Part-time",
        "EmploymentType_Self-employed",
        "EmploymentType_Unemployed",
    ],
    reference: Some("Full-time"),
};

pub const MARITAL_GROUP: IndicatorGroup = IndicatorGroup {
    field: "MaritalStatus",
    columns: &["Marital_Married", "Marital_Single"],
    reference: Some("Divorced"),
};

pub const PURPOSE_GROUP: IndicatorGroup = IndicatorGroup {
    field: "LoanPurpose",
    columns: &[
        "Purpose_Business",
        "Purpose_Education",
        "Purpose_Home",
        "Purpose_Other",
    ],
    reference: None,
};

pub const INDICATOR_GROUPS: [IndicatorGroup; 4] =
    [EDUCATION_GROUP, EMPLOYMENT_GROUP, MARITAL_GROUP, PURPOSE_GROUP];

// Column indices of each indicator; `None` marks a reference category.

fn education_column(education: Education) -> usize {
    match education {
        Education::Bachelors => 12,
        Education::HighSchool => 13,
        Education::Masters => 14,
        Education::Phd => 15,
    }
}

fn employment_column(employment: EmploymentType) -> Option<usize> {
    match employment {
        EmploymentType::FullTime => None,
        EmploymentType::PartTime => Some(16),
        EmploymentType::SelfEmployed => Some(17),
        EmploymentType::Unemployed => Some(18),
    }
}

fn marital_column(status: MaritalStatus) -> Option<usize> {
    match status {
        MaritalStatus::Divorced => None,
        MaritalStatus::Married => Some(19),
        MaritalStatus::Single => Some(20),
    }
}

fn purpose_column(purpose: LoanPurpose) -> usize {
    match purpose {
        LoanPurpose::Business => 21,
        LoanPurpose::Education => 22,
        LoanPurpose::Home => 23,
        LoanPurpose::Other => 24,
    }
}

/// One encoded row, keyed by [`FEATURE_COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn columns(&self) -> &'static [&'static str] {
        &FEATURE_COLUMNS
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|name| *name == column)
            .map(|index| self.values[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }

    /// Values of one indicator group, in column order.
    pub fn group(&self, group: &IndicatorGroup) -> Vec<(&'static str, f64)> {
        self.iter()
            .filter(|(name, _)| group.columns.contains(name))
            .collect()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Pure encoder from validated records to feature rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder {
    guard: IntakeGuard,
}

impl FeatureEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn encode(&self, record: &ApplicantRecord) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];

        values[0] = record.age as f64;
        values[1] = record.income as f64;
        values[2] = record.loan_amount as f64;
        values[3] = record.credit_score as f64;
        values[4] = record.months_employed as f64;
        values[5] = record.num_credit_lines as f64;
        values[6] = record.interest_rate;
        values[7] = record.loan_term.months() as f64;
        values[8] = record.dti_ratio;
        values[9] = record.has_mortgage.indicator();
        values[10] = record.has_dependents.indicator();
        values[11] = record.has_co_signer.indicator();

        values[education_column(record.education)] = 1.0;
        if let Some(column) = employment_column(record.employment_type) {
            values[column] = 1.0;
        }
        if let Some(column) = marital_column(record.marital_status) {
            values[column] = 1.0;
        }
        values[purpose_column(record.loan_purpose)] = 1.0;

        FeatureVector { values }
    }

    /// Validate a raw form and encode it.
    pub fn encode_form(&self, form: &ApplicantForm) -> Result<FeatureVector, IntakeError> {
        let record = self.guard.record_from_form(form)?;
        Ok(self.encode(&record))
    }
}
