use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalId {
    Chatbot,
    DocumentAnalysis,
    RiskAssessment,
    ConsultationBooking,
}

impl ModalId {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Chatbot,
            Self::DocumentAnalysis,
            Self::RiskAssessment,
            Self::ConsultationBooking,
        ]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Chatbot => "chatbot",
            Self::DocumentAnalysis => "document_analysis",
            Self::RiskAssessment => "risk_assessment",
            Self::ConsultationBooking => "consultation_booking",
        }
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown modal '{0}'")]
pub struct UnknownModal(pub String);

impl FromStr for ModalId {
    type Err = UnknownModal;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|modal| modal.slug() == normalized)
            .ok_or_else(|| UnknownModal(value.to_string()))
    }
}

/// Visibility flags for the overlay panels. Panels are independent: opening one
/// never hides another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalController {
    visible: BTreeSet<ModalId>,
}

impl ModalController {
    pub fn open(&mut self, modal: ModalId) {
        self.visible.insert(modal);
    }

    /// Returns whether the modal was visible before the call.
    pub fn close(&mut self, modal: ModalId) -> bool {
        self.visible.remove(&modal)
    }

    /// Flips visibility and returns the new state.
    pub fn toggle(&mut self, modal: ModalId) -> bool {
        if self.close(modal) {
            false
        } else {
            self.open(modal);
            true
        }
    }

    /// Hides every panel and reports which ones were visible.
    pub fn close_all(&mut self) -> Vec<ModalId> {
        std::mem::take(&mut self.visible).into_iter().collect()
    }

    pub fn is_open(&self, modal: ModalId) -> bool {
        self.visible.contains(&modal)
    }

    pub fn open_modals(&self) -> Vec<ModalId> {
        self.visible.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modals_can_be_open_together() {
        let mut modals = ModalController::default();
        modals.open(ModalId::RiskAssessment);
        modals.open(ModalId::ConsultationBooking);

        assert!(modals.is_open(ModalId::RiskAssessment));
        assert!(modals.is_open(ModalId::ConsultationBooking));
        assert!(!modals.is_open(ModalId::Chatbot));
    }

    #[test]
    fn close_all_hides_everything() {
        let mut modals = ModalController::default();
        modals.open(ModalId::Chatbot);
        modals.open(ModalId::DocumentAnalysis);

        let closed = modals.close_all();

        assert_eq!(closed, vec![ModalId::Chatbot, ModalId::DocumentAnalysis]);
        assert!(modals.open_modals().is_empty());
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut modals = ModalController::default();
        assert!(modals.toggle(ModalId::Chatbot));
        assert!(!modals.toggle(ModalId::Chatbot));
        assert!(!modals.is_open(ModalId::Chatbot));
    }

    #[test]
    fn opening_twice_is_idempotent() {
        let mut modals = ModalController::default();
        modals.open(ModalId::Chatbot);
        modals.open(ModalId::Chatbot);
        assert!(modals.close(ModalId::Chatbot));
        assert!(!modals.close(ModalId::Chatbot));
    }

    #[test]
    fn parses_path_slugs() {
        assert_eq!("document-analysis".parse::<ModalId>(), Ok(ModalId::DocumentAnalysis));
        assert_eq!("Chatbot".parse::<ModalId>(), Ok(ModalId::Chatbot));
        assert!("sidebar".parse::<ModalId>().is_err());
    }
}
