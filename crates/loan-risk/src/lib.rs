//! Applicant feature encoding and default-risk scoring.
//!
//! The [`prediction`] module turns a loan application into the column layout the
//! trained classifier expects and scores it. `config`, `telemetry` and `error`
//! carry the service plumbing shared with the HTTP binary.

pub mod config;
pub mod error;
pub mod prediction;
pub mod telemetry;
