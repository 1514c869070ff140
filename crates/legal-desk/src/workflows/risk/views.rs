use serde::Serialize;

use super::domain::{concern_label, RiskAssessmentInput, RiskLevel};
use super::rules::{ScoreBreakdown, ScoreComponent};
use crate::render::unordered_list;

pub const RECOMMENDATIONS: [&str; 4] = [
    "Review and update your legal compliance procedures",
    "Consider legal insurance for high-risk areas",
    "Schedule regular legal health checks",
    "Implement proper documentation practices",
];

/// Result view shown after the assessment form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub level_label: &'static str,
    pub status_class: &'static str,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<&'static str>,
    pub components: Vec<ScoreComponent>,
}

impl RiskAssessment {
    pub(crate) fn from_breakdown(input: &RiskAssessmentInput, breakdown: ScoreBreakdown) -> Self {
        let risk_factors = input
            .distinct_concerns()
            .into_iter()
            .map(|tag| concern_label(tag).to_string())
            .collect();

        Self {
            score: breakdown.score,
            level: breakdown.level,
            level_label: breakdown.level.label(),
            status_class: breakdown.level.status_class(),
            risk_factors,
            recommendations: RECOMMENDATIONS.to_vec(),
            components: breakdown.components,
        }
    }

    pub fn render_html(&self) -> String {
        let mut html = String::from("<div class=\"risk-results\">");
        html.push_str("<div class=\"risk-score\"><h4>Overall Risk Score</h4>");
        html.push_str(&format!(
            "<div class=\"score-display\"><span class=\"score-number\">{}/100</span><span class=\"status status--{}\">{} Risk</span></div></div>",
            self.score, self.status_class, self.level_label
        ));
        html.push_str("<div class=\"risk-breakdown\"><h5>Risk Factors:</h5>");
        html.push_str(&unordered_list(&self.risk_factors));
        html.push_str("</div><div class=\"recommendations\"><h5>Recommendations:</h5>");
        html.push_str(&unordered_list(&self.recommendations));
        html.push_str("</div></div>");
        html
    }

    /// Plain-text summary used by the CLI.
    pub fn summary_line(&self) -> String {
        format!(
            "Overall risk score {}/100 ({} Risk)",
            self.score, self.level_label
        )
    }
}
