use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use legal_desk::workflows::analysis::AnalysisBackend;
use legal_desk::workflows::session::{desk_router, DeskService, SessionStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_desk_routes<S, B>(service: Arc<DeskService<S, B>>) -> axum::Router
where
    S: SessionStore + 'static,
    B: AnalysisBackend + 'static,
{
    desk_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemorySessionStore;
    use axum::body::Body;
    use axum::http::Request;
    use legal_desk::config::DeskConfig;
    use legal_desk::workflows::analysis::HttpAnalysisBackend;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> (axum::Router, Arc<AtomicBool>) {
        let readiness = Arc::new(AtomicBool::new(ready));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let service = Arc::new(DeskService::new(
            Arc::new(InMemorySessionStore::default()),
            Arc::new(HttpAnalysisBackend::new(DeskConfig::DEFAULT_ANALYSIS_ENDPOINT)),
            DeskConfig::default(),
        ));
        let router = with_desk_routes(service).layer(Extension(state));
        (router, readiness)
    }

    async fn status_of(router: axum::Router, request: Request<Body>) -> StatusCode {
        router
            .oneshot(request)
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let (router, readiness) = app(false);
        let request = || Request::get("/ready").body(Body::empty()).expect("request");

        assert_eq!(
            status_of(router.clone(), request()).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        readiness.store(true, Ordering::Release);
        assert_eq!(status_of(router, request()).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_render_as_text() {
        let (router, _) = app(true);
        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn desk_routes_are_mounted() {
        let (router, _) = app(true);
        let request = Request::post("/api/v1/sessions")
            .body(Body::empty())
            .expect("request");

        assert_eq!(status_of(router, request).await, StatusCode::CREATED);
    }
}
