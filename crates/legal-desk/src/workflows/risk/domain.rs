use serde::{Deserialize, Serialize};

/// Raw form submission. Categorical fields keep the form's option values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessmentInput {
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default, alias = "employees")]
    pub employee_count: String,
    #[serde(default)]
    pub concerns: Vec<String>,
}

impl RiskAssessmentInput {
    /// Concern tags with blanks and repeats removed, first occurrence order kept.
    pub fn distinct_concerns(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.concerns.len());
        for concern in &self.concerns {
            let tag = concern.trim();
            if !tag.is_empty() && !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        seen
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Baseline,
    BusinessType,
    Industry,
    EmployeeCount,
    Concerns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `> 60` is high, `31..=60` medium, everything else low.
    pub const fn from_score(score: u8) -> Self {
        if score > 60 {
            Self::High
        } else if score > 30 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Status badge modifier used by the result markup.
    pub const fn status_class(self) -> &'static str {
        match self {
            Self::Low => "success",
            Self::Medium => "warning",
            Self::High => "error",
        }
    }
}

const CONCERN_LABELS: [(&str, &str); 5] = [
    ("contracts", "Contract Management"),
    ("compliance", "Regulatory Compliance"),
    ("intellectual-property", "Intellectual Property"),
    ("employment", "Employment Law"),
    ("data-protection", "Data Protection"),
];

/// Display label for a concern tag; unknown tags are shown as submitted.
pub fn concern_label(tag: &str) -> &str {
    CONCERN_LABELS
        .iter()
        .find(|(key, _)| *key == tag)
        .map(|(_, label)| *label)
        .unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries_are_exclusive_on_the_upper_band() {
        assert_eq!(RiskLevel::from_score(61), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(31), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn concern_labels_fall_back_to_tag() {
        assert_eq!(concern_label("data-protection"), "Data Protection");
        assert_eq!(concern_label("tax"), "tax");
    }

    #[test]
    fn form_field_names_deserialize() {
        let input: RiskAssessmentInput = serde_json::from_str(
            r#"{"businessType":"startup","industry":"finance","employees":"1-10","concerns":["contracts"]}"#,
        )
        .expect("form payload parses");
        assert_eq!(input.employee_count, "1-10");
        assert_eq!(input.concerns, vec!["contracts".to_string()]);
    }

    #[test]
    fn distinct_concerns_drop_repeats_and_blanks() {
        let input = RiskAssessmentInput {
            concerns: vec![
                "compliance".to_string(),
                " ".to_string(),
                "contracts".to_string(),
                "compliance".to_string(),
            ],
            ..RiskAssessmentInput::default()
        };
        assert_eq!(input.distinct_concerns(), vec!["compliance", "contracts"]);
    }
}
