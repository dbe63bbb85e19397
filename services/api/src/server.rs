use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use loan_portal::applications::{FileAuditSink, LinearModelArtifact, LoanDecisionService};
use loan_portal::config::AppConfig;
use loan_portal::error::AppError;
use loan_portal::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    // The artifact is loaded exactly once; a missing or mismatched file
    // aborts startup instead of serving undecidable requests.
    let artifact = LinearModelArtifact::load(&config.model.artifact_path)?;
    info!(
        path = %config.model.artifact_path.display(),
        threshold = artifact.threshold,
        "classifier artifact loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let audit_sink = Arc::new(FileAuditSink::new(&config.audit.log_path));
    let service = Arc::new(LoanDecisionService::new(
        config.encoding,
        Arc::new(artifact),
        audit_sink,
    ));

    let app = with_portal_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        encoding = config.encoding.label(),
        audit_log = %config.audit.log_path.display(),
        "loan approval portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
