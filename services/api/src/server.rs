use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus_erp::config::AppConfig;
use campus_erp::error::AppError;
use campus_erp::telemetry;
use campus_erp::workflows::admissions::AdmissionService;
use campus_erp::workflows::fees::FeeService;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, AtomicSerialCounter, InMemoryAccountDirectory, InMemoryAdmissionRepository,
    InMemoryCourseCatalog, InMemoryEnrollmentRegistry, InMemoryFeeLedger,
};
use crate::routes::with_workflow_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let serials = Arc::new(AtomicSerialCounter::default());
    let admission_service = Arc::new(AdmissionService::new(
        Arc::new(InMemoryAdmissionRepository::default()),
        Arc::new(InMemoryAccountDirectory::default()),
        Arc::new(InMemoryEnrollmentRegistry::default()),
        Arc::new(InMemoryCourseCatalog::default()),
        serials.clone(),
        &config.serials,
    ));
    let fee_service = Arc::new(FeeService::new(
        Arc::new(InMemoryFeeLedger::default()),
        serials,
        &config.serials,
    ));

    let app = with_workflow_routes(admission_service, fee_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "student management service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
