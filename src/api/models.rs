use serde::Serialize;
use serde_json::Value;

/// Successful reply.
#[derive(Debug, Serialize)]
pub struct DialogueResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Reads `message` from an arbitrary JSON body. Anything other than a
/// string is treated as absent.
pub fn extract_message(body: &Value) -> &str {
    body.get("message").and_then(Value::as_str).unwrap_or("").trim()
}
