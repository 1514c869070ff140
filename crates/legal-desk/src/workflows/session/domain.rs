use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::workflows::analysis::{AnalysisDesk, ProgressSnapshot};
use crate::workflows::assistant::ChatTranscript;
use crate::workflows::booking::BookingConfirmation;
use crate::workflows::faq::FaqAccordion;
use crate::workflows::modal::{ModalController, ModalId};
use crate::workflows::risk::RiskAssessment;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        let token: u64 = rand::thread_rng().gen();
        Self(format!("visit-{token:016x}"))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State one visitor accumulates while using the site.
#[derive(Debug, Clone)]
pub struct VisitorSession {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    /// Time of the last interaction, on the runtime clock.
    pub last_seen: Instant,
    pub modals: ModalController,
    pub faq: FaqAccordion,
    pub transcript: ChatTranscript,
    pub analysis: AnalysisDesk,
    pub last_risk: Option<RiskAssessment>,
    pub last_booking: Option<BookingConfirmation>,
}

impl VisitorSession {
    pub fn new(id: SessionId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            last_seen: Instant::now(),
            modals: ModalController::default(),
            faq: FaqAccordion::default(),
            transcript: ChatTranscript::default(),
            analysis: AnalysisDesk::new(),
            last_risk: None,
            last_booking: None,
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn is_idle(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_seen) >= ttl
    }

    /// Opening the document panel always starts from a clean upload area.
    pub fn open_modal(&mut self, modal: ModalId) {
        if modal == ModalId::DocumentAnalysis {
            self.analysis.reset();
        }
        self.modals.open(modal);
    }

    /// Returns whether the panel was open.
    pub fn close_modal(&mut self, modal: ModalId) -> bool {
        let was_open = self.modals.close(modal);
        self.clear_panel(modal);
        was_open
    }

    /// Returns the panel's new visibility.
    pub fn toggle_modal(&mut self, modal: ModalId) -> bool {
        if self.modals.is_open(modal) {
            self.close_modal(modal);
            false
        } else {
            self.open_modal(modal);
            true
        }
    }

    /// Closes every panel. The analysis is reset even when its panel was not open.
    pub fn close_all_modals(&mut self) -> Vec<ModalId> {
        let closed = self.modals.close_all();
        for modal in &closed {
            self.clear_panel(*modal);
        }
        self.analysis.reset();
        closed
    }

    fn clear_panel(&mut self, modal: ModalId) {
        match modal {
            ModalId::DocumentAnalysis => {
                self.analysis.reset();
            }
            ModalId::RiskAssessment => self.last_risk = None,
            ModalId::ConsultationBooking => self.last_booking = None,
            ModalId::Chatbot => {}
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            created_at: self.created_at,
            open_modals: self.modals.open_modals(),
            faq_expanded: self.faq.expanded(),
            chat_messages: self.transcript.len(),
            analysis: self.analysis.snapshot(),
            last_risk: self.last_risk.clone(),
            last_booking: self.last_booking.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub open_modals: Vec<ModalId>,
    pub faq_expanded: Option<usize>,
    pub chat_messages: usize,
    pub analysis: ProgressSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_risk: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_booking: Option<BookingConfirmation>,
}
