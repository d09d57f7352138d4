use crate::cli::ServeArgs;
use crate::infra::{AppState, Backends};
use crate::routes::with_operational_routes;
use axum::extract::DefaultBodyLimit;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cadre::config::AppConfig;
use cadre::error::AppError;
use cadre::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    telemetry::init(&config.telemetry)?;

    let backends = Backends::open(&config)?;
    backends.files.ensure_root().await?;
    let portal = backends.portal(&config);
    if config.accounts.seed_sample_data {
        let created = portal.accounts().seed_sample_users()?;
        info!(created, "sample accounts checked");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        store: Arc::clone(&backends.store),
    };

    let app = with_operational_routes(portal.router(&config.session))
        .layer(DefaultBodyLimit::max(config.uploads.max_body_bytes))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        uploads = %backends.files.root().display(),
        renderer = backends.renderer.program(),
        "hr portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
