use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::time::Instant;

use crate::config::DeskConfig;
use crate::workflows::analysis::{
    AnalysisBackend, AnalysisMode, DocumentUpload, RemoteAnalysis, RemoteAnalysisError,
};
use crate::workflows::session::{
    desk_router, DeskService, SessionId, SessionStore, StoreError, VisitorSession,
};

pub(super) const BOUNDARY: &str = "desk-test-boundary";

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    sessions: Arc<Mutex<HashMap<SessionId, VisitorSession>>>,
}

impl SessionStore for MemorySessions {
    fn create(&self, session: VisitorSession) -> Result<VisitorSession, StoreError> {
        let mut guard = self.sessions.lock().expect("sessions mutex");
        if guard.contains_key(&session.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<VisitorSession>, StoreError> {
        Ok(self.sessions.lock().expect("sessions mutex").get(id).cloned())
    }

    fn update(&self, session: VisitorSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("sessions mutex");
        match guard.get_mut(&session.id) {
            Some(slot) => {
                *slot = session;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn remove(&self, id: &SessionId) -> Result<Option<VisitorSession>, StoreError> {
        Ok(self.sessions.lock().expect("sessions mutex").remove(id))
    }

    fn remove_idle(&self, idle_since: Instant) -> Result<Vec<VisitorSession>, StoreError> {
        let mut guard = self.sessions.lock().expect("sessions mutex");
        let (idle, kept): (HashMap<_, _>, HashMap<_, _>) = guard
            .drain()
            .partition(|(_, session)| session.last_seen <= idle_since);
        *guard = kept;
        Ok(idle.into_values().collect())
    }
}

pub(super) struct UnavailableSessions;

impl SessionStore for UnavailableSessions {
    fn create(&self, _session: VisitorSession) -> Result<VisitorSession, StoreError> {
        Err(StoreError::Unavailable("maintenance".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<VisitorSession>, StoreError> {
        Err(StoreError::Unavailable("maintenance".to_string()))
    }

    fn update(&self, _session: VisitorSession) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("maintenance".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<Option<VisitorSession>, StoreError> {
        Err(StoreError::Unavailable("maintenance".to_string()))
    }

    fn remove_idle(&self, _idle_since: Instant) -> Result<Vec<VisitorSession>, StoreError> {
        Err(StoreError::Unavailable("maintenance".to_string()))
    }
}

/// Backend answering every request with a fixed result.
pub(super) struct ScriptedBackend {
    pub(super) response: Result<RemoteAnalysis, RemoteAnalysisError>,
}

impl ScriptedBackend {
    pub(super) fn succeeding() -> Self {
        Self {
            response: Ok(RemoteAnalysis {
                message: "File analyzed successfully".to_string(),
                word_count: 1250,
                summary: "Standard commercial lease.".to_string(),
            }),
        }
    }

    pub(super) fn unreachable() -> Self {
        Self {
            response: Err(RemoteAnalysisError::Unreachable {
                detail: "connection refused".to_string(),
            }),
        }
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn analyze(&self, _upload: &DocumentUpload) -> Result<RemoteAnalysis, RemoteAnalysisError> {
        self.response.clone()
    }
}

pub(super) fn desk_config(mode: AnalysisMode) -> DeskConfig {
    DeskConfig {
        analysis_mode: mode,
        progress_tick: Duration::from_millis(800),
        completion_delay: Duration::from_millis(1000),
        ..DeskConfig::default()
    }
}

pub(super) fn build_service(
    backend: ScriptedBackend,
) -> (Arc<DeskService<MemorySessions, ScriptedBackend>>, MemorySessions) {
    build_service_with(backend, desk_config(AnalysisMode::Simulated))
}

pub(super) fn build_service_with(
    backend: ScriptedBackend,
    config: DeskConfig,
) -> (Arc<DeskService<MemorySessions, ScriptedBackend>>, MemorySessions) {
    let sessions = MemorySessions::default();
    let service = DeskService::new(Arc::new(sessions.clone()), Arc::new(backend), config);
    (Arc::new(service), sessions)
}

pub(super) fn short_lived(ttl: Duration) -> DeskConfig {
    DeskConfig {
        session_ttl: ttl,
        ..desk_config(AnalysisMode::Simulated)
    }
}

pub(super) fn router_with(backend: ScriptedBackend) -> axum::Router {
    let (service, _) = build_service(backend);
    desk_router(service)
}

pub(super) fn pdf_upload(name: &str) -> DocumentUpload {
    DocumentUpload {
        file_name: name.to_string(),
        media_type: Some("application/pdf".to_string()),
        bytes: b"%PDF-1.7 lease terms".to_vec(),
    }
}

/// Long enough for any simulated run: at most twenty ticks plus the completion delay.
pub(super) const FULL_RUN: Duration = Duration::from_secs(30);

pub(super) fn multipart_body(file: Option<(&str, &str, &[u8])>, mode: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(mode) = mode {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"mode\"\r\n\r\n{mode}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
