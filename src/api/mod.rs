mod handlers;
mod models;

use std::sync::Arc;

use axum::{routing::any, Router};

use crate::AppState;

pub use handlers::{dialogue, not_found};
pub use models::{extract_message, DialogueResponse, ErrorResponse};

pub const DIALOGUE_PATH: &str = "/api/dialogue";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(DIALOGUE_PATH, any(dialogue))
        .fallback(not_found)
        .with_state(state)
}
