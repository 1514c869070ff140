use chrono::NaiveDate;
use serde::Serialize;

use crate::render::{detail_line, unordered_list};
use crate::workflows::risk::RiskLevel;

pub const KEY_FINDINGS: [&str; 4] = [
    "✓ Document structure is legally compliant",
    "⚠️ 2 clauses require attention",
    "ℹ️ 3 recommendations for improvement",
    "✓ No critical risks identified",
];

pub const DOWNLOAD_NOTICE: &str = "Analysis report downloaded successfully! In a real application, this would download a detailed PDF report with findings and recommendations.";

/// Result view for a completed simulated analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub document: String,
    pub analysis_date: NaiveDate,
    pub risk_level: RiskLevel,
    pub key_findings: Vec<&'static str>,
}

impl AnalysisReport {
    pub fn new(document: &str, analysis_date: NaiveDate) -> Self {
        Self {
            document: document.to_string(),
            analysis_date,
            risk_level: RiskLevel::Medium,
            key_findings: KEY_FINDINGS.to_vec(),
        }
    }

    pub fn render_html(&self) -> String {
        let mut html = String::from("<div class=\"analysis-results\"><h4>Analysis Complete</h4>");
        html.push_str("<div class=\"result-summary\">");
        html.push_str(&detail_line("Document", &self.document));
        html.push_str(&detail_line(
            "Analysis Date",
            &self.analysis_date.format("%Y-%m-%d").to_string(),
        ));
        html.push_str(&format!(
            "<p><strong>Risk Level:</strong> <span class=\"status status--{}\">{}</span></p>",
            self.risk_level.status_class(),
            self.risk_level.label()
        ));
        html.push_str("</div><div class=\"result-highlights\"><h5>Key Findings:</h5>");
        html.push_str(&unordered_list(&self.key_findings));
        html.push_str("</div></div>");
        html
    }
}
