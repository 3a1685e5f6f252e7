use std::error::Error;
use std::fmt;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::config::{CompletionSettings, FALLBACK_ANSWER};

/// Connection details for one chat-completion call.
pub struct BridgeConfig<'a> {
    pub url: &'a str,
    pub api_key: &'a str,
    pub timeout_ms: Option<u64>,
    pub settings: &'a CompletionSettings,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug)]
pub enum BridgeError {
    Timeout,
    Request(reqwest::Error),
    Status { status: StatusCode, body: String },
    Body(reqwest::Error),
    Decode(serde_json::Error),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "upstream request timed out"),
            Self::Request(err) => write!(f, "failed to send upstream request: {err}"),
            Self::Status { status, body } => {
                write!(f, "upstream responded with {status}: {body}")
            }
            Self::Body(err) => write!(f, "failed to read upstream response: {err}"),
            Self::Decode(err) => write!(f, "failed to decode upstream response: {err}"),
        }
    }
}

impl Error for BridgeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(err) | Self::Body(err) => Some(err),
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

pub fn completion_request<'a>(
    settings: &'a CompletionSettings,
    message: &'a str,
) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model: &settings.model,
        messages: [
            ChatMessage {
                role: "system",
                content: &settings.system_prompt,
            },
            ChatMessage {
                role: "user",
                content: message,
            },
        ],
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
    }
}

/// Sends `message` to the provider and returns the trimmed reply, or the
/// fallback sentence when the reply carries no text.
pub async fn ask_via_bridge(
    client: &reqwest::Client,
    message: &str,
    cfg: &BridgeConfig<'_>,
) -> Result<String, BridgeError> {
    let exchange = async {
        let response = client
            .post(cfg.url)
            .bearer_auth(cfg.api_key)
            .json(&completion_request(cfg.settings, message))
            .send()
            .await
            .map_err(BridgeError::Request)?;
        let status = response.status();
        let body = response.text().await.map_err(BridgeError::Body)?;
        Ok::<_, BridgeError>((status, body))
    };

    // Covers the body read as well as the send.
    let (status, body) = match cfg.timeout_ms {
        Some(ms) => timeout(Duration::from_millis(ms), exchange)
            .await
            .map_err(|_| BridgeError::Timeout)??,
        None => exchange.await?,
    };
    debug!(%status, bytes = body.len(), "upstream responded");

    if !status.is_success() {
        return Err(BridgeError::Status { status, body });
    }

    let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(BridgeError::Decode)?;
    Ok(extract_answer(parsed).unwrap_or_else(|| FALLBACK_ANSWER.to_string()))
}

fn extract_answer(response: ChatCompletionResponse) -> Option<String> {
    let content = response.choices?.into_iter().next()?.message?.content?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Option<String> {
        extract_answer(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn extracts_first_choice_trimmed() {
        let raw = r#"{"choices":[{"message":{"content":"  Hello.  "}},{"message":{"content":"second"}}]}"#;
        assert_eq!(parse(raw).as_deref(), Some("Hello."));
    }

    #[test]
    fn missing_or_blank_content_yields_none() {
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"choices":null}"#), None);
        assert_eq!(parse(r#"{"choices":[]}"#), None);
        assert_eq!(parse(r#"{"choices":[{}]}"#), None);
        assert_eq!(parse(r#"{"choices":[{"message":{"content":null}}]}"#), None);
        assert_eq!(parse(r#"{"choices":[{"message":{"content":"   "}}]}"#), None);
    }

    #[test]
    fn request_payload_has_fixed_shape() {
        let settings = CompletionSettings::default();
        let payload = serde_json::to_value(completion_request(&settings, "Who am I?")).unwrap();

        assert_eq!(payload["model"], "gpt-4.1-mini");
        assert_eq!(payload["max_tokens"], 600);
        assert!((payload["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][0]["content"], settings.system_prompt.as_str());
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(payload["messages"][1]["content"], "Who am I?");
    }
}
