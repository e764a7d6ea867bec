use crate::cli::ServeArgs;
use crate::infra::{AppState, StaticTokenIdentity};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use skillhub::config::{AppConfig, AppEnvironment};
use skillhub::error::AppError;
use skillhub::marketplace::{InMemoryMarketplaceStore, MarketplaceService};
use skillhub::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryMarketplaceStore::default());
    let identity = Arc::new(StaticTokenIdentity::default());
    if config.environment != AppEnvironment::Production {
        seed_demo_identities(&identity);
    }
    let service = Arc::new(MarketplaceService::new(store, identity));

    let app = with_marketplace_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "marketplace service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn seed_demo_identities(identity: &StaticTokenIdentity) {
    identity.issue("demo-client-token", "demo-client", "client@skillhub.dev");
    identity.issue(
        "demo-freelancer-token",
        "demo-freelancer",
        "freelancer@skillhub.dev",
    );
    info!("issued development bearer tokens: demo-client-token, demo-freelancer-token");
}
