use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header::ORIGIN, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    bridge::{ask_via_bridge, BridgeConfig},
    error::DialogueError,
    AppState,
};

use super::models::{extract_message, DialogueResponse, ErrorResponse};

/// Single entry point for every method on the dialogue route.
pub async fn dialogue(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let origin = headers.get(ORIGIN);

    if method == Method::OPTIONS {
        return (StatusCode::NO_CONTENT, state.cors.preflight_headers(origin)).into_response();
    }

    let cors = state.cors.headers(origin);
    match answer(&state, &method, body).await {
        Ok(reply) => {
            info!(chars = reply.chars().count(), "dialogue answered");
            (StatusCode::OK, cors, Json(DialogueResponse { answer: reply })).into_response()
        }
        Err(err) => {
            if err.is_client_error() {
                warn!(%method, status = %err.status(), "dialogue rejected: {err}");
            } else {
                error!(
                    status = %err.status(),
                    upstream_status = ?err.upstream_status(),
                    detail = ?err.to_body().detail,
                    "dialogue failed: {err}"
                );
            }
            (err.status(), cors, Json(err.to_body())).into_response()
        }
    }
}

async fn answer(
    state: &AppState,
    method: &Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<String, DialogueError> {
    if *method != Method::POST {
        return Err(DialogueError::MethodNotAllowed);
    }

    // An unreadable body (too large, aborted) is reported like malformed JSON.
    let body = body.map_err(|rejection| {
        warn!(status = %rejection.status(), "failed to read request body: {}", rejection.body_text());
        DialogueError::InvalidJson
    })?;
    let payload: Value = serde_json::from_slice(&body).map_err(|_| DialogueError::InvalidJson)?;

    let message = extract_message(&payload);
    if message.is_empty() {
        return Err(DialogueError::EmptyMessage);
    }

    let api_key = state
        .config
        .api_key
        .as_deref()
        .ok_or(DialogueError::MissingApiKey)?;

    let bridge = BridgeConfig {
        url: &state.config.upstream_url,
        api_key,
        timeout_ms: state.config.timeout_ms,
        settings: &state.config.completion,
    };

    Ok(ask_via_bridge(&state.http, message, &bridge).await?)
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
            detail: None,
        }),
    )
        .into_response()
}
