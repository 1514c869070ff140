use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore};
use crate::routes::with_desk_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use legal_desk::config::AppConfig;
use legal_desk::error::AppError;
use legal_desk::telemetry;
use legal_desk::workflows::analysis::HttpAnalysisBackend;
use legal_desk::workflows::session::DeskService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(mode) = args.analysis_mode.take() {
        config.desk.analysis_mode = mode;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let sessions = Arc::new(InMemorySessionStore::default());
    let backend = Arc::new(HttpAnalysisBackend::new(
        config.desk.analysis_endpoint.clone(),
    ));
    let desk_service = Arc::new(DeskService::new(sessions, backend, config.desk.clone()));
    desk_service.clone().spawn_session_sweeper();

    let app = with_desk_routes(desk_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        analysis_mode = %config.desk.analysis_mode,
        analysis_endpoint = %config.desk.analysis_endpoint,
        session_ttl_secs = config.desk.session_ttl.as_secs(),
        "legal desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
