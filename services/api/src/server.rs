use crate::cli::ServeArgs;
use crate::infra::{seeded_state, AppState, LogNotifier};
use crate::routes::with_academic_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use registrar::academics::{AcademicStore, RegistrarService};
use registrar::config::AppConfig;
use registrar::error::AppError;
use registrar::telemetry;

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

    let store = Arc::new(AcademicStore::new(seeded_state()));
    let service = Arc::new(RegistrarService::new(store, Arc::new(LogNotifier)));

    let app = with_academic_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "registrar service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
