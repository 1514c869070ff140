use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::SessionId;
use super::service::{AnalysisStarted, DeskError, DeskService, Rendered};
use super::store::SessionStore;
use crate::workflows::analysis::{AnalysisBackend, AnalysisMode, DocumentUpload, MAX_UPLOAD_BYTES};
use crate::workflows::booking::{BookingData, ContactSubmission};
use crate::workflows::modal::ModalId;
use crate::workflows::risk::RiskAssessmentInput;

/// Request bodies may exceed the upload limit so oversized files reach validation and
/// get the friendly rejection instead of a bare 413.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES as usize + 1024 * 1024;

type Desk<S, B> = State<Arc<DeskService<S, B>>>;

/// Router exposing the visitor-facing desk endpoints.
pub fn desk_router<S, B>(service: Arc<DeskService<S, B>>) -> Router
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(open_session::<S, B>))
        .route(
            "/api/v1/sessions/:session_id",
            get(session_handler::<S, B>).delete(close_session::<S, B>),
        )
        .route(
            "/api/v1/sessions/:session_id/modals",
            get(modals_handler::<S, B>).delete(close_all_modals::<S, B>),
        )
        .route(
            "/api/v1/sessions/:session_id/modals/:modal/:action",
            post(modal_action::<S, B>),
        )
        .route(
            "/api/v1/sessions/:session_id/faq/:index/toggle",
            post(toggle_faq::<S, B>),
        )
        .route(
            "/api/v1/sessions/:session_id/chat",
            get(transcript_handler::<S, B>).post(chat_handler::<S, B>),
        )
        .route("/api/v1/sessions/:session_id/risk", post(risk_handler::<S, B>))
        .route(
            "/api/v1/sessions/:session_id/consultations",
            post(consultation_handler::<S, B>),
        )
        .route(
            "/api/v1/sessions/:session_id/analysis",
            get(analysis_status::<S, B>).post(analysis_upload::<S, B>),
        )
        .route(
            "/api/v1/sessions/:session_id/analysis/report",
            get(analysis_report::<S, B>),
        )
        .route(
            "/api/v1/sessions/:session_id/analysis/report/download",
            post(download_report::<S, B>),
        )
        .route("/api/v1/contact", post(contact_handler::<S, B>))
        .route("/api/v1/newsletter", post(newsletter_handler::<S, B>))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(service)
}

pub(crate) async fn open_session<S, B>(State(service): Desk<S, B>) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.open_session() {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn session_handler<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.session(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn close_session<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.close_session(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn modals_handler<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.open_modals(&SessionId(session_id)) {
        Ok(open) => (StatusCode::OK, Json(json!({ "open": open }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn close_all_modals<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.close_all_modals(&SessionId(session_id)) {
        Ok(closed) => (StatusCode::OK, Json(json!({ "closed": closed, "open": [] }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn modal_action<S, B>(
    State(service): Desk<S, B>,
    Path((session_id, modal, action)): Path<(String, String, String)>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    let modal = match modal.parse::<ModalId>() {
        Ok(modal) => modal,
        Err(err) => return DeskError::from(err).into_response(),
    };
    let id = SessionId(session_id);

    let result = match action.as_str() {
        "open" => service.open_modal(&id, modal),
        "close" => service.close_modal(&id, modal),
        "toggle" => service.toggle_modal(&id, modal),
        other => {
            let payload = json!({ "error": format!("unsupported modal action '{other}'") });
            return (StatusCode::NOT_FOUND, Json(payload)).into_response();
        }
    };

    match result {
        Ok(open) => (StatusCode::OK, Json(json!({ "open": open }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn toggle_faq<S, B>(
    State(service): Desk<S, B>,
    Path((session_id, index)): Path<(String, usize)>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.toggle_faq(&SessionId(session_id), index) {
        Ok(expanded) => (StatusCode::OK, Json(json!({ "expanded": expanded }))).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    #[serde(default)]
    message: String,
}

pub(crate) async fn chat_handler<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.chat(&SessionId(session_id), &request.message) {
        Ok(exchange) => (StatusCode::OK, Json(json!({ "exchange": exchange }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn transcript_handler<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.transcript(&SessionId(session_id)) {
        Ok(messages) => (StatusCode::OK, Json(json!({ "messages": messages }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn risk_handler<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
    Json(input): Json<RiskAssessmentInput>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.assess_risk(&SessionId(session_id), &input) {
        Ok(assessment) => {
            let view = Rendered::new(assessment, |assessment| assessment.render_html());
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn consultation_handler<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
    Json(data): Json<BookingData>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.book_consultation(&SessionId(session_id), &data) {
        Ok(confirmation) => {
            let view = Rendered::new(confirmation, |confirmation| confirmation.render_html());
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn contact_handler<S, B>(
    State(service): Desk<S, B>,
    Json(submission): Json<ContactSubmission>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.submit_contact(&submission) {
        Ok(message) => (StatusCode::OK, Json(json!({ "message": message }))).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewsletterRequest {
    #[serde(default)]
    email: String,
}

pub(crate) async fn newsletter_handler<S, B>(
    State(service): Desk<S, B>,
    Json(request): Json<NewsletterRequest>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.subscribe_newsletter(&request.email) {
        Ok(message) => (StatusCode::OK, Json(json!({ "message": message }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn analysis_upload<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    let (upload, mode) = match read_upload(multipart).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    match service.start_analysis(&SessionId(session_id), upload, mode).await {
        Ok(started @ AnalysisStarted::Simulated { .. }) => {
            (StatusCode::ACCEPTED, Json(started)).into_response()
        }
        Ok(started @ AnalysisStarted::Remote { .. }) => {
            (StatusCode::OK, Json(started)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn analysis_status<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.analysis_status(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn analysis_report<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.analysis_report(&SessionId(session_id)) {
        Ok(report) => {
            let view = Rendered::new(report, |report| report.render_html());
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn download_report<S, B>(
    State(service): Desk<S, B>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    match service.download_report(&SessionId(session_id)) {
        Ok(message) => (StatusCode::OK, Json(json!({ "message": message }))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Reads the `file` part and the optional `mode` part. A request without a file
/// yields an upload with an empty name, which validation reports as missing.
async fn read_upload(
    mut multipart: Multipart,
) -> Result<(DocumentUpload, Option<AnalysisMode>), Response> {
    let mut upload = DocumentUpload {
        file_name: String::new(),
        media_type: None,
        bytes: Vec::new(),
    };
    let mut mode = None;

    while let Some(field) = multipart.next_field().await.map_err(IntoResponse::into_response)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                upload.file_name = field.file_name().unwrap_or_default().to_string();
                upload.media_type = field.content_type().map(str::to_string);
                upload.bytes = field
                    .bytes()
                    .await
                    .map_err(IntoResponse::into_response)?
                    .to_vec();
            }
            Some("mode") => {
                let raw = field.text().await.map_err(IntoResponse::into_response)?;
                if !raw.trim().is_empty() {
                    let parsed = raw
                        .parse::<AnalysisMode>()
                        .map_err(|err| DeskError::from(err).into_response())?;
                    mode = Some(parsed);
                }
            }
            _ => {}
        }
    }

    Ok((upload, mode))
}
