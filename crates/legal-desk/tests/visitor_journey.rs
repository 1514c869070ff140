use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::time::Instant;
use legal_desk::config::DeskConfig;
use legal_desk::workflows::analysis::{
    AnalysisBackend, AnalysisPhase, DocumentUpload, RemoteAnalysis, RemoteAnalysisError,
};
use legal_desk::workflows::assistant::respond;
use legal_desk::workflows::booking::BookingData;
use legal_desk::workflows::modal::ModalId;
use legal_desk::workflows::risk::{assess, RiskAssessmentInput, RiskLevel};
use legal_desk::workflows::session::{
    AnalysisStarted, DeskService, SessionId, SessionStore, StoreError, VisitorSession,
};

#[derive(Default)]
struct Sessions {
    records: Mutex<HashMap<SessionId, VisitorSession>>,
}

impl SessionStore for Sessions {
    fn create(&self, session: VisitorSession) -> Result<VisitorSession, StoreError> {
        let mut guard = self.records.lock().expect("store mutex");
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<VisitorSession>, StoreError> {
        Ok(self.records.lock().expect("store mutex").get(id).cloned())
    }

    fn update(&self, session: VisitorSession) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex");
        guard.insert(session.id.clone(), session);
        Ok(())
    }

    fn remove(&self, id: &SessionId) -> Result<Option<VisitorSession>, StoreError> {
        Ok(self.records.lock().expect("store mutex").remove(id))
    }

    fn remove_idle(&self, idle_since: Instant) -> Result<Vec<VisitorSession>, StoreError> {
        let mut guard = self.records.lock().expect("store mutex");
        let idle: Vec<SessionId> = guard
            .values()
            .filter(|session| session.last_seen <= idle_since)
            .map(|session| session.id.clone())
            .collect();
        Ok(idle.iter().filter_map(|id| guard.remove(id)).collect())
    }
}

struct OfflineBackend;

#[async_trait]
impl AnalysisBackend for OfflineBackend {
    async fn analyze(&self, _upload: &DocumentUpload) -> Result<RemoteAnalysis, RemoteAnalysisError> {
        Err(RemoteAnalysisError::Unreachable {
            detail: "offline".to_string(),
        })
    }
}

fn service() -> DeskService<Sessions, OfflineBackend> {
    DeskService::new(
        Arc::new(Sessions::default()),
        Arc::new(OfflineBackend),
        DeskConfig::default(),
    )
}

#[test]
fn startup_in_finance_with_two_concerns_is_high_risk() {
    let input = RiskAssessmentInput {
        business_type: "startup".to_string(),
        industry: "finance".to_string(),
        employee_count: "1-10".to_string(),
        concerns: vec!["contracts".to_string(), "compliance".to_string()],
    };

    let assessment = assess(&input);

    // 50 + 15 + 25 + 10 + 2 * 5 = 110, clamped.
    assert_eq!(assessment.score, 100);
    assert_eq!(assessment.level, RiskLevel::High);
    assert_eq!(assessment.status_class, "error");
    assert_eq!(assessment.recommendations.len(), 4);
}

#[test]
fn large_retail_corporation_is_medium_risk() {
    let input = RiskAssessmentInput {
        business_type: "corporation".to_string(),
        industry: "retail".to_string(),
        employee_count: "200+".to_string(),
        concerns: Vec::new(),
    };

    let assessment = assess(&input);

    assert_eq!(assessment.score, 40);
    assert_eq!(assessment.level, RiskLevel::Medium);
    assert!(assessment.risk_factors.is_empty());
}

#[test]
fn assistant_prefers_earlier_table_entries() {
    assert_eq!(
        respond("HELLO, can you check my Contract?"),
        respond("contract")
    );
}

#[tokio::test(start_paused = true)]
async fn visitor_books_scores_and_analyzes() {
    let desk = service();
    let id = desk.open_session().expect("session").session_id;

    desk.open_modal(&id, ModalId::Chatbot).expect("chat open");
    let exchange = desk
        .chat(&id, "What are your pricing plans?")
        .expect("chat")
        .expect("reply");
    assert_eq!(exchange.bot.text, respond("pricing"));

    desk.open_modal(&id, ModalId::ConsultationBooking)
        .expect("booking open");
    let today = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
    let booking = desk
        .book_consultation_on(
            &id,
            &BookingData {
                name: Some("Lin".to_string()),
                email: Some("lin@example.com".to_string()),
                date: Some("2025-01-20".to_string()),
                time: Some("10:00".to_string()),
                consultation_type: None,
            },
            today,
        )
        .expect("booked");
    assert_eq!(booking.consultation_type, "N/A");

    desk.open_modal(&id, ModalId::DocumentAnalysis)
        .expect("analysis open");
    let started = desk
        .start_analysis(
            &id,
            DocumentUpload {
                file_name: "supplier-agreement.doc".to_string(),
                media_type: Some("application/msword".to_string()),
                bytes: vec![0; 2048],
            },
            None,
        )
        .await
        .expect("accepted");
    assert!(matches!(started, AnalysisStarted::Simulated { .. }));

    tokio::time::sleep(Duration::from_secs(30)).await;

    let view = desk.session(&id).expect("view");
    assert_eq!(view.analysis.phase, AnalysisPhase::Presented);
    assert_eq!(
        view.open_modals,
        vec![
            ModalId::Chatbot,
            ModalId::DocumentAnalysis,
            ModalId::ConsultationBooking
        ]
    );
    assert_eq!(view.chat_messages, 2);
    assert!(view.last_booking.is_some());

    let closed = desk.close_all_modals(&id).expect("closed");
    assert_eq!(closed.len(), 3);
    let view = desk.session(&id).expect("view");
    assert_eq!(view.analysis.phase, AnalysisPhase::Idle);
    assert!(view.last_booking.is_none());
}
