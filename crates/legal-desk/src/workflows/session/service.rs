use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::domain::{SessionId, SessionView, VisitorSession};
use super::store::{SessionStore, StoreError};
use crate::config::DeskConfig;
use crate::workflows::analysis::{
    AnalysisBackend, AnalysisError, AnalysisMode, AnalysisReport, DocumentUpload, Pacing,
    ProgressSnapshot, RandomIncrements, RemoteAnalysis, RemoteAnalysisError, UnknownAnalysisMode,
    UploadRejection, DOWNLOAD_NOTICE,
};
use crate::workflows::assistant::{ChatExchange, ChatMessage};
use crate::workflows::booking::{self, BookingConfirmation, BookingData, ContactSubmission, FormError};
use crate::workflows::modal::{ModalId, UnknownModal};
use crate::workflows::risk::{self, RiskAssessment, RiskAssessmentInput};

/// Service behind every desk interaction: looks up the visitor's session, applies the
/// interaction, and writes the session back.
pub struct DeskService<S, B> {
    sessions: Arc<S>,
    backend: Arc<B>,
    config: DeskConfig,
}

impl<S, B> DeskService<S, B>
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    pub fn new(sessions: Arc<S>, backend: Arc<B>, config: DeskConfig) -> Self {
        Self {
            sessions,
            backend,
            config,
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn open_session(&self) -> Result<SessionView, DeskError> {
        let session = VisitorSession::new(SessionId::generate(), Utc::now());
        let stored = self.sessions.create(session)?;
        info!(session = %stored.id, "visitor session opened");
        Ok(stored.view())
    }

    pub fn session(&self, id: &SessionId) -> Result<SessionView, DeskError> {
        self.modify(id, |session| session.view())
    }

    /// Drops the session, cancelling any analysis it was running.
    pub fn close_session(&self, id: &SessionId) -> Result<(), DeskError> {
        let removed = self
            .sessions
            .remove(id)?
            .ok_or_else(|| DeskError::SessionNotFound(id.clone()))?;
        removed.analysis.reset();
        info!(session = %id, "visitor session closed");
        Ok(())
    }

    pub fn open_modals(&self, id: &SessionId) -> Result<Vec<ModalId>, DeskError> {
        self.modify(id, |session| session.modals.open_modals())
    }

    pub fn open_modal(&self, id: &SessionId, modal: ModalId) -> Result<Vec<ModalId>, DeskError> {
        self.modify(id, |session| {
            session.open_modal(modal);
            session.modals.open_modals()
        })
    }

    pub fn close_modal(&self, id: &SessionId, modal: ModalId) -> Result<Vec<ModalId>, DeskError> {
        self.modify(id, |session| {
            session.close_modal(modal);
            session.modals.open_modals()
        })
    }

    pub fn toggle_modal(&self, id: &SessionId, modal: ModalId) -> Result<Vec<ModalId>, DeskError> {
        self.modify(id, |session| {
            session.toggle_modal(modal);
            session.modals.open_modals()
        })
    }

    /// Returns the panels that were open before the call.
    pub fn close_all_modals(&self, id: &SessionId) -> Result<Vec<ModalId>, DeskError> {
        self.modify(id, VisitorSession::close_all_modals)
    }

    pub fn toggle_faq(&self, id: &SessionId, index: usize) -> Result<Option<usize>, DeskError> {
        self.modify(id, |session| session.faq.toggle(index))
    }

    /// Appends the visitor's message and the canned reply. Blank input leaves the
    /// transcript untouched and yields `None`.
    pub fn chat(&self, id: &SessionId, message: &str) -> Result<Option<ChatExchange>, DeskError> {
        self.modify(id, |session| session.transcript.send(message))
    }

    pub fn transcript(&self, id: &SessionId) -> Result<Vec<ChatMessage>, DeskError> {
        self.modify(id, |session| session.transcript.messages().to_vec())
    }

    pub fn assess_risk(
        &self,
        id: &SessionId,
        input: &RiskAssessmentInput,
    ) -> Result<RiskAssessment, DeskError> {
        let assessment = risk::assess(input);
        info!(
            session = %id,
            score = assessment.score,
            level = assessment.level_label,
            "risk assessment scored"
        );
        self.modify(id, |session| {
            session.last_risk = Some(assessment.clone());
        })?;
        Ok(assessment)
    }

    pub fn book_consultation(
        &self,
        id: &SessionId,
        data: &BookingData,
    ) -> Result<BookingConfirmation, DeskError> {
        self.book_consultation_on(id, data, Local::now().date_naive())
    }

    pub fn book_consultation_on(
        &self,
        id: &SessionId,
        data: &BookingData,
        today: NaiveDate,
    ) -> Result<BookingConfirmation, DeskError> {
        let confirmation = booking::book_consultation(data, today)?;
        self.modify(id, |session| {
            session.last_booking = Some(confirmation.clone());
        })?;
        info!(session = %id, "consultation booked");
        Ok(confirmation)
    }

    pub fn submit_contact(&self, submission: &ContactSubmission) -> Result<&'static str, DeskError> {
        Ok(booking::submit_contact(submission)?)
    }

    pub fn subscribe_newsletter(&self, email: &str) -> Result<&'static str, DeskError> {
        Ok(booking::subscribe_newsletter(email)?)
    }

    /// Accepts an upload and hands it to the selected analysis path. A simulated run is
    /// driven in the background; a remote run completes before this returns.
    pub async fn start_analysis(
        &self,
        id: &SessionId,
        upload: DocumentUpload,
        mode: Option<AnalysisMode>,
    ) -> Result<AnalysisStarted, DeskError> {
        let desk = self.modify(id, |session| session.analysis.clone())?;
        let mode = mode.unwrap_or(self.config.analysis_mode);

        match mode {
            AnalysisMode::Simulated => {
                let ticket = desk.start_simulated(&upload.candidate()).map_err(|err| {
                    warn!(session = %id, file = %upload.file_name, reason = %err, "upload rejected");
                    DeskError::from(err)
                })?;
                desk.spawn_simulation(ticket, Pacing::from(&self.config), RandomIncrements::new());
                Ok(AnalysisStarted::Simulated {
                    progress: desk.snapshot(),
                })
            }
            AnalysisMode::Remote => {
                let analysis = desk.analyze_remote(self.backend.as_ref(), &upload).await?;
                Ok(AnalysisStarted::Remote {
                    notice: analysis.notice(),
                    analysis,
                })
            }
        }
    }

    pub fn analysis_status(&self, id: &SessionId) -> Result<ProgressSnapshot, DeskError> {
        self.modify(id, |session| session.analysis.snapshot())
    }

    pub fn analysis_report(&self, id: &SessionId) -> Result<AnalysisReport, DeskError> {
        self.modify(id, |session| session.analysis.report())?
            .ok_or(DeskError::ReportNotReady)
    }

    pub fn download_report(&self, id: &SessionId) -> Result<&'static str, DeskError> {
        self.analysis_report(id)?;
        Ok(DOWNLOAD_NOTICE)
    }

    /// Drops every session idle for at least the configured time to live and cancels
    /// their analyses. Returns how many were dropped.
    pub fn expire_idle_sessions(&self) -> Result<usize, DeskError> {
        let Some(idle_since) = Instant::now().checked_sub(self.config.session_ttl) else {
            return Ok(0);
        };
        let expired = self.sessions.remove_idle(idle_since)?;
        for session in &expired {
            session.analysis.reset();
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "idle visitor sessions expired");
        }
        Ok(expired.len())
    }

    /// Runs [`Self::expire_idle_sessions`] on a timer for as long as the service lives.
    pub fn spawn_session_sweeper(self: Arc<Self>) -> JoinHandle<()> {
        let period = self.config.session_sweep_period();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if let Err(err) = self.expire_idle_sessions() {
                    warn!(error = %err, "session sweep failed");
                }
            }
        })
    }

    fn load(&self, id: &SessionId) -> Result<VisitorSession, DeskError> {
        let session = self
            .sessions
            .fetch(id)?
            .ok_or_else(|| DeskError::SessionNotFound(id.clone()))?;

        if session.is_idle(self.config.session_ttl, Instant::now()) {
            if let Some(expired) = self.sessions.remove(id)? {
                expired.analysis.reset();
            }
            debug!(session = %id, "visitor session expired on access");
            return Err(DeskError::SessionNotFound(id.clone()));
        }
        Ok(session)
    }

    /// Every interaction, reads included, counts as activity.
    fn modify<T>(
        &self,
        id: &SessionId,
        apply: impl FnOnce(&mut VisitorSession) -> T,
    ) -> Result<T, DeskError> {
        let mut session = self.load(id)?;
        let outcome = apply(&mut session);
        session.touch();
        self.sessions.update(session)?;
        Ok(outcome)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisStarted {
    Simulated {
        progress: ProgressSnapshot,
    },
    Remote {
        notice: String,
        analysis: RemoteAnalysis,
    },
}

/// A view-model together with its escaped HTML fragment.
#[derive(Debug, Clone, Serialize)]
pub struct Rendered<T: Serialize> {
    #[serde(flatten)]
    pub view: T,
    pub html: String,
}

impl<T: Serialize> Rendered<T> {
    pub fn new(view: T, render: impl FnOnce(&T) -> String) -> Self {
        let html = render(&view);
        Self { view, html }
    }
}

/// Error raised by the desk service.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Upload(#[from] UploadRejection),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Remote(#[from] RemoteAnalysisError),
    #[error(transparent)]
    Modal(#[from] UnknownModal),
    #[error(transparent)]
    Mode(#[from] UnknownAnalysisMode),
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("no analysis report is available yet")]
    ReportNotReady,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AnalysisError> for DeskError {
    fn from(value: AnalysisError) -> Self {
        match value {
            AnalysisError::Upload(err) => Self::Upload(err),
            AnalysisError::Remote(err) => Self::Remote(err),
        }
    }
}

impl DeskError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeskError::Upload(UploadRejection::AnalysisInProgress) => StatusCode::CONFLICT,
            DeskError::Upload(_) | DeskError::Form(_) | DeskError::Mode(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DeskError::SessionNotFound(_)
            | DeskError::Modal(_)
            | DeskError::ReportNotReady
            | DeskError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            DeskError::Remote(_) => StatusCode::BAD_GATEWAY,
            DeskError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string() });
        (self.status_code(), Json(payload)).into_response()
    }
}
