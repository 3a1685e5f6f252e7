//! Error taxonomy for the dialogue endpoint.

use axum::http::StatusCode;
use thiserror::Error;

use crate::{api::ErrorResponse, bridge::BridgeError};

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON in request body.")]
    InvalidJson,

    #[error("No message provided.")]
    EmptyMessage,

    #[error("Server is missing OPENAI_API_KEY.")]
    MissingApiKey,

    #[error("OpenAI API error.")]
    Upstream { status: StatusCode, body: String },

    #[error("Unexpected error calling OpenAI.")]
    Unexpected(String),
}

impl DialogueError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidJson | Self::EmptyMessage => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Status the provider answered with, when it answered at all.
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Caller mistakes, as opposed to server or provider failures.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    pub fn to_body(&self) -> ErrorResponse {
        let detail = match self {
            Self::Upstream { body, .. } => Some(body.clone()),
            Self::Unexpected(detail) => Some(detail.clone()),
            _ => None,
        };
        ErrorResponse {
            error: self.to_string(),
            detail,
        }
    }
}

impl From<BridgeError> for DialogueError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Status { status, body } => Self::Upstream { status, body },
            other => Self::Unexpected(other.to_string()),
        }
    }
}
