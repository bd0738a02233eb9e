//! Wire types for the OpenAI-compatible chat API served by Ollama.
//!
//! Parsing lives in plain functions over response bodies so it can be
//! tested without a server.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use slogan_application::ResponderError;
use slogan_domain::Model;

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelListResponse {
    data: Vec<ModelListEntry>,
}

#[derive(Deserialize)]
struct ModelListEntry {
    id: String,
}

/// Join an API root and an endpoint path
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Reply text of the first choice
pub(crate) fn parse_chat_response(body: &str) -> Result<String, ResponderError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ResponderError::InvalidResponse(format!("malformed chat response: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ResponderError::InvalidResponse("no content in chat response".to_string()))
}

/// Model ids from a `/models` listing; blank ids are skipped
pub(crate) fn parse_model_list(body: &str) -> Result<Vec<Model>, ResponderError> {
    let parsed: ModelListResponse = serde_json::from_str(body)
        .map_err(|e| ResponderError::InvalidResponse(format!("malformed model list: {e}")))?;

    Ok(parsed
        .data
        .into_iter()
        .filter_map(|entry| Model::new(entry.id).ok())
        .collect())
}

/// Map a non-success HTTP status to a responder error
pub(crate) fn map_http_error(status: StatusCode, body: &str, model: &str) -> ResponderError {
    let message = error_message(body);

    if status == StatusCode::NOT_FOUND && message.to_lowercase().contains("model") {
        return ResponderError::ModelNotAvailable(model.to_string());
    }

    ResponderError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message))
}

/// `{"error": {"message": ..}}`, `{"error": ".."}` or the raw body
fn error_message(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.trim().to_string(),
    };
    match &value["error"] {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string()),
        _ => body.trim().to_string(),
    }
}
