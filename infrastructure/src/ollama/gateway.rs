//! Ollama chat gateway - implements the ChatGateway port
//!
//! Talks to the OpenAI-compatible endpoints Ollama exposes under `/v1`:
//! `POST /chat/completions` for replies and `GET /models` for the catalog.

use super::protocol::{
    ChatCompletionRequest, ChatMessage, endpoint, map_http_error, parse_chat_response,
    parse_model_list,
};
use crate::config::FileOllamaConfig;
use async_trait::async_trait;
use reqwest::Client;
use slogan_application::{ChatGateway, Responder, ResponderError};
use slogan_domain::{AgentRole, Model, PromptTemplate};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Connection and sampling settings for the chat backend
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaSettings {
    pub base_url: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl From<&FileOllamaConfig> for OllamaSettings {
    fn from(config: &FileOllamaConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_timeout: Duration::from_secs(config.timeout),
        }
    }
}

/// Gateway to an Ollama (or any OpenAI-compatible) server
pub struct OllamaGateway {
    client: Client,
    settings: Arc<OllamaSettings>,
}

impl OllamaGateway {
    pub fn new(settings: OllamaSettings) -> Result<Self, ResponderError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ResponderError::Other(format!("failed to build HTTP client: {e}")))?;

        info!(base_url = %settings.base_url, "Using chat backend");
        Ok(Self {
            client,
            settings: Arc::new(settings),
        })
    }

    pub fn settings(&self) -> &OllamaSettings {
        &self.settings
    }
}

#[async_trait]
impl ChatGateway for OllamaGateway {
    async fn create_responder(
        &self,
        model: &Model,
        role: AgentRole,
    ) -> Result<Box<dyn Responder>, ResponderError> {
        debug!(%model, %role, "Creating responder");
        Ok(Box::new(OllamaResponder {
            client: self.client.clone(),
            settings: Arc::clone(&self.settings),
            model: model.clone(),
            role,
        }))
    }

    async fn available_models(&self) -> Result<Vec<Model>, ResponderError> {
        let url = endpoint(&self.settings.base_url, "models");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(ResponderError::RequestFailed(format!(
                "HTTP {} while listing models: {}",
                status.as_u16(),
                body.trim()
            )));
        }
        parse_model_list(&body)
    }
}

/// One role bound to one model
struct OllamaResponder {
    client: Client,
    settings: Arc<OllamaSettings>,
    model: Model,
    role: AgentRole,
}

#[async_trait]
impl Responder for OllamaResponder {
    async fn respond(&self, prompt: &str) -> Result<String, ResponderError> {
        let request = ChatCompletionRequest {
            model: self.model.as_str(),
            messages: vec![
                ChatMessage::system(PromptTemplate::system(self.role)),
                ChatMessage::user(prompt),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            stream: false,
        };

        let url = endpoint(&self.settings.base_url, "chat/completions");
        debug!(role = %self.role, model = %self.model, bytes = prompt.len(), "Sending chat request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_http_error(status, &body, self.model.as_str()));
        }

        let text = parse_chat_response(&body)?;
        debug!(role = %self.role, bytes = text.len(), "Received chat reply");
        Ok(text)
    }
}

fn map_transport_error(err: reqwest::Error) -> ResponderError {
    if err.is_timeout() {
        ResponderError::Timeout
    } else if err.is_connect() {
        ResponderError::Connection(err.to_string())
    } else {
        ResponderError::RequestFailed(err.to_string())
    }
}
