use clap::Args;
use loan_risk::config::AppConfig;
use loan_risk::error::AppError;
use loan_risk::prediction::{ApplicantForm, LoanRiskService, PredictionOutcome, RiskScorer};
use std::path::PathBuf;

/// Applicant flags. Defaults match the initial values of the web form.
#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Model artifact to score with (defaults to LOAN_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Print the encoded feature vector after the verdict
    #[arg(long)]
    pub(crate) show_features: bool,
    #[arg(long, default_value_t = 30)]
    pub(crate) age: i64,
    #[arg(long, default_value_t = 50_000)]
    pub(crate) income: i64,
    #[arg(long, default_value_t = 20_000)]
    pub(crate) loan_amount: i64,
    #[arg(long, default_value_t = 650)]
    pub(crate) credit_score: i64,
    #[arg(long, default_value_t = 12)]
    pub(crate) months_employed: i64,
    #[arg(long, default_value_t = 2)]
    pub(crate) num_credit_lines: i64,
    /// Annual interest rate in percent
    #[arg(long, default_value_t = 10.0)]
    pub(crate) interest_rate: f64,
    /// Loan term in months (12, 24, 36, 48 or 60)
    #[arg(long, default_value_t = 12)]
    pub(crate) loan_term: i64,
    #[arg(long, default_value_t = 0.3)]
    pub(crate) dti_ratio: f64,
    #[arg(long, default_value = "No")]
    pub(crate) has_mortgage: String,
    #[arg(long, default_value = "No")]
    pub(crate) has_dependents: String,
    #[arg(long, default_value = "No")]
    pub(crate) has_co_signer: String,
    #[arg(long, default_value = "High School")]
    pub(crate) education: String,
    #[arg(long, default_value = "Full-time")]
    pub(crate) employment_type: String,
    #[arg(long, default_value = "Divorced")]
    pub(crate) marital_status: String,
    #[arg(long, default_value = "Business")]
    pub(crate) loan_purpose: String,
}

impl PredictArgs {
    fn form(&self) -> ApplicantForm {
        ApplicantForm {
            age: self.age,
            income: self.income,
            loan_amount: self.loan_amount,
            credit_score: self.credit_score,
            months_employed: self.months_employed,
            num_credit_lines: self.num_credit_lines,
            interest_rate: self.interest_rate,
            loan_term: self.loan_term,
            dti_ratio: self.dti_ratio,
            has_mortgage: self.has_mortgage.clone(),
            has_dependents: self.has_dependents.clone(),
            has_co_signer: self.has_co_signer.clone(),
            education: self.education.clone(),
            employment_type: self.employment_type.clone(),
            marital_status: self.marital_status.clone(),
            loan_purpose: self.loan_purpose.clone(),
        }
    }
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let model_path = match args.model.clone() {
        Some(path) => path,
        None => AppConfig::load()?.model.artifact_path,
    };

    let scorer = RiskScorer::from_artifact_path(&model_path)?;
    let model_name = scorer.classifier().name().to_string();
    let service = LoanRiskService::new(scorer);

    let outcome = service.predict(&args.form())?;
    print!(
        "{}",
        render_outcome(&model_name, &outcome, args.show_features)
    );
    Ok(())
}

fn render_outcome(model_name: &str, outcome: &PredictionOutcome, show_features: bool) -> String {
    let mut out = format!(
        "Prediction Result ({model_name})\n  {}\n  Default Probability: {}\n",
        outcome.assessment.verdict(),
        outcome.assessment.probability_percent()
    );

    if show_features {
        out.push_str("\nEncoded features\n");
        for (column, value) in outcome.features.iter() {
            out.push_str(&format!("  {column:<30} {value}\n"));
        }
    }
    out
}
