//! Post-generation structural validators.
//!
//! LLM output is not guaranteed to follow the template the prompt asked for, so
//! generated weekly reports and OKRs are re-checked here. Validators never
//! fail; they describe what is wrong.

pub mod okr;
pub mod report;

pub use okr::{validate_okr, OkrValidation};
pub use report::{validate_report, ReportValidation};
