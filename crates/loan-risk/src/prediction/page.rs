//! Server-rendered intake form and result panel.

use super::domain::{
    ApplicantForm, Education, EmploymentType, LoanPurpose, LoanTerm, MaritalStatus, YesNo,
};
use super::intake::{
    FieldRange, AGE, CREDIT_SCORE, DTI_RATIO, INCOME, INTEREST_RATE, LOAN_AMOUNT,
    MONTHS_EMPLOYED, NUM_CREDIT_LINES,
};
use super::scoring::{RiskAssessment, RiskLabel};

pub const SUBMIT_LABEL: &str = "Predict Loan Risk";

/// What to show under the form.
#[derive(Debug, Clone, PartialEq)]
pub enum PagePanel {
    Empty,
    Result(RiskAssessment),
    Invalid(String),
}

pub fn render_page(form: &ApplicantForm, panel: &PagePanel) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Loan Default Prediction</title>\n</head>\n<body>\n\
         <h1>Loan Default Prediction System</h1>\n<h3>Enter Applicant Details</h3>\n\
         <form method=\"post\" action=\"/\">\n",
    );

    number_input(&mut html, "Age", AGE, form.age as f64, "1");
    number_input(&mut html, "Income", INCOME, form.income as f64, "1");
    number_input(&mut html, "Loan Amount", LOAN_AMOUNT, form.loan_amount as f64, "1");
    number_input(&mut html, "Credit Score", CREDIT_SCORE, form.credit_score as f64, "1");
    number_input(
        &mut html,
        "Months Employed",
        MONTHS_EMPLOYED,
        form.months_employed as f64,
        "1",
    );
    number_input(
        &mut html,
        "Number of Credit Lines",
        NUM_CREDIT_LINES,
        form.num_credit_lines as f64,
        "1",
    );
    number_input(&mut html, "Interest Rate", INTEREST_RATE, form.interest_rate, "0.01");

    let terms: Vec<String> = LoanTerm::ordered()
        .iter()
        .map(|term| term.months().to_string())
        .collect();
    select(
        &mut html,
        "Loan Term (months)",
        "LoanTerm",
        terms.iter().map(String::as_str),
        &form.loan_term.to_string(),
    );

    number_input(&mut html, "DTI Ratio", DTI_RATIO, form.dti_ratio, "0.01");

    let yes_no = || YesNo::ordered().iter().map(|choice| choice.label());
    select(&mut html, "Has Mortgage", "HasMortgage", yes_no(), &form.has_mortgage);
    select(&mut html, "Has Dependents", "HasDependents", yes_no(), &form.has_dependents);
    select(&mut html, "Has Co-Signer", "HasCoSigner", yes_no(), &form.has_co_signer);
    select(
        &mut html,
        "Education",
        "Education",
        Education::ordered().iter().map(|choice| choice.label()),
        &form.education,
    );
    select(
        &mut html,
        "Employment Type",
        "EmploymentType",
        EmploymentType::ordered().iter().map(|choice| choice.label()),
        &form.employment_type,
    );
    select(
        &mut html,
        "Marital Status",
        "MaritalStatus",
        MaritalStatus::ordered().iter().map(|choice| choice.label()),
        &form.marital_status,
    );
    select(
        &mut html,
        "Loan Purpose",
        "LoanPurpose",
        LoanPurpose::ordered().iter().map(|choice| choice.label()),
        &form.loan_purpose,
    );

    html.push_str(&format!(
        "<hr>\n<button type=\"submit\">{SUBMIT_LABEL}</button>\n</form>\n"
    ));

    match panel {
        PagePanel::Empty => {}
        PagePanel::Result(assessment) => {
            let class = match assessment.label {
                RiskLabel::HighRisk => "error",
                RiskLabel::LowRisk => "success",
            };
            html.push_str(&format!(
                "<section id=\"result\">\n<h2>Prediction Result</h2>\n\
                 <p class=\"{class}\">{}</p>\n\
                 <p>Default Probability: <strong>{}</strong></p>\n</section>\n",
                assessment.verdict(),
                assessment.probability_percent()
            ));
        }
        PagePanel::Invalid(message) => {
            html.push_str(&format!(
                "<section id=\"result\">\n<p class=\"error\">{}</p>\n</section>\n",
                escape(message)
            ));
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn number_input(html: &mut String, label: &str, range: FieldRange, value: f64, step: &str) {
    html.push_str(&format!(
        "<label>{label} <input type=\"number\" name=\"{}\" min=\"{}\" max=\"{}\" step=\"{step}\" value=\"{value}\" required></label><br>\n",
        range.field, range.min, range.max
    ));
}

fn select<'a>(
    html: &mut String,
    label: &str,
    name: &str,
    choices: impl Iterator<Item = &'a str>,
    selected: &str,
) {
    html.push_str(&format!("<label>{label} <select name=\"{name}\">\n"));
    for choice in choices {
        let marker = if choice == selected { " selected" } else { "" };
        let choice = escape(choice);
        html.push_str(&format!(
            "<option value=\"{choice}\"{marker}>{choice}</option>\n"
        ));
    }
    html.push_str("</select></label><br>\n");
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
