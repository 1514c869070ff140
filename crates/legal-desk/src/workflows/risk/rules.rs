use serde::Serialize;

use super::domain::{RiskAssessmentInput, RiskFactor, RiskLevel};

pub const BASE_SCORE: i32 = 50;
pub const CONCERN_WEIGHT: i32 = 5;

pub const BUSINESS_TYPE_WEIGHTS: [(&str, i32); 4] = [
    ("startup", 15),
    ("small-business", 10),
    ("corporation", -5),
    ("non-profit", 5),
];

pub const INDUSTRY_WEIGHTS: [(&str, i32); 5] = [
    ("technology", 10),
    ("healthcare", 20),
    ("finance", 25),
    ("retail", 5),
    ("manufacturing", 15),
];

pub const EMPLOYEE_COUNT_WEIGHTS: [(&str, i32); 4] = [
    ("1-10", 10),
    ("11-50", 5),
    ("51-200", -5),
    ("200+", -10),
];

/// Discrete contribution to a score, kept for auditing the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub factor: RiskFactor,
    pub points: i32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    /// Sum of all components before clamping.
    pub raw_total: i32,
    pub score: u8,
    pub level: RiskLevel,
}

pub fn score(input: &RiskAssessmentInput) -> u8 {
    score_input(input).score
}

pub fn score_input(input: &RiskAssessmentInput) -> ScoreBreakdown {
    let mut components = vec![ScoreComponent {
        factor: RiskFactor::Baseline,
        points: BASE_SCORE,
        notes: "baseline exposure".to_string(),
    }];

    components.push(categorical_component(
        RiskFactor::BusinessType,
        "business type",
        &input.business_type,
        &BUSINESS_TYPE_WEIGHTS,
    ));
    components.push(categorical_component(
        RiskFactor::Industry,
        "industry",
        &input.industry,
        &INDUSTRY_WEIGHTS,
    ));
    components.push(categorical_component(
        RiskFactor::EmployeeCount,
        "employee band",
        &input.employee_count,
        &EMPLOYEE_COUNT_WEIGHTS,
    ));

    let concern_count = input.distinct_concerns().len();
    let concern_points = i32::try_from(concern_count)
        .unwrap_or(i32::MAX)
        .saturating_mul(CONCERN_WEIGHT);
    components.push(ScoreComponent {
        factor: RiskFactor::Concerns,
        points: concern_points,
        notes: format!("{concern_count} selected concern(s)"),
    });

    let raw_total = components
        .iter()
        .fold(0i32, |total, component| total.saturating_add(component.points));
    let score = raw_total.clamp(0, 100) as u8;

    ScoreBreakdown {
        components,
        raw_total,
        score,
        level: RiskLevel::from_score(score),
    }
}

fn categorical_component(
    factor: RiskFactor,
    field: &str,
    value: &str,
    table: &[(&str, i32)],
) -> ScoreComponent {
    let value = value.trim();
    match table.iter().find(|(key, _)| *key == value) {
        Some((_, points)) => ScoreComponent {
            factor,
            points: *points,
            notes: format!("{field} '{value}'"),
        },
        None => ScoreComponent {
            factor,
            points: 0,
            notes: if value.is_empty() {
                format!("{field} not provided")
            } else {
                format!("{field} '{value}' not weighted")
            },
        },
    }
}
