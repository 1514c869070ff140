//! Legal risk scoring for the self-service assessment form.

pub mod domain;
mod rules;
pub mod views;

pub use domain::{concern_label, RiskAssessmentInput, RiskFactor, RiskLevel};
pub use rules::{
    score, score_input, ScoreBreakdown, ScoreComponent, BASE_SCORE, BUSINESS_TYPE_WEIGHTS,
    CONCERN_WEIGHT, EMPLOYEE_COUNT_WEIGHTS, INDUSTRY_WEIGHTS,
};
pub use views::{RiskAssessment, RECOMMENDATIONS};

/// Scores the submission and builds the result view.
pub fn assess(input: &RiskAssessmentInput) -> RiskAssessment {
    let breakdown = score_input(input);
    RiskAssessment::from_breakdown(input, breakdown)
}
