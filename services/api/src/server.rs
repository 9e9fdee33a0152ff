use crate::cli::ServeArgs;
use crate::commands::load_config;
use crate::infra::AppState;
use crate::routes::with_console_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use shelter_console::error::AppError;
use shelter_console::gateway::HttpShelterGateway;
use shelter_console::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs, gateway_url: Option<String>) -> Result<(), AppError> {
    let mut config = load_config(gateway_url)?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = Arc::new(HttpShelterGateway::new(&config.gateway)?);
    let app = with_console_routes(gateway)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        gateway = %config.gateway.base_url,
        "shelter allocation console ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
