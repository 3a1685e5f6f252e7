pub mod api;
pub mod bridge;
pub mod config;
pub mod cors;
pub mod error;
pub mod prompt;

use std::sync::Arc;

use axum::Router;

pub use config::AppConfig;
pub use cors::CorsPolicy;
pub use error::DialogueError;

/// Read-only state shared by every request.
pub struct AppState {
    pub config: AppConfig,
    pub cors: CorsPolicy,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            cors: CorsPolicy::new(&config.allowed_origins),
            http: reqwest::Client::new(),
            config,
        }
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, host: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await
}
