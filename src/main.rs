use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dialogue_service::{build_app, config::API_KEY_VAR, run_server, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dialogue_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    if config.api_key.is_none() {
        warn!("{} is not set; every dialogue request will fail with 500", API_KEY_VAR);
    }
    info!(
        model = %config.completion.model,
        origins = ?config.allowed_origins,
        "starting dialogue service"
    );

    let host = config.host.clone();
    let port = config.port;
    let app = build_app(Arc::new(AppState::new(config)));

    run_server(app, &host, port)
        .await
        .context("server failed")
}
