//! Responder port
//!
//! Defines the interface for the chat backend that plays the writer and
//! reviewer roles.

use async_trait::async_trait;
use slogan_domain::{AgentRole, Model};
use thiserror::Error;

/// Errors that can occur while talking to a responder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ResponderError {
    /// The backend could not be reached at all
    pub fn is_connection(&self) -> bool {
        matches!(self, ResponderError::Connection(_))
    }

    /// The backend is down or does not serve the requested model
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(
            self,
            ResponderError::Connection(_) | ResponderError::ModelNotAvailable(_)
        )
    }
}

/// Something that turns a prompt into a text reply.
///
/// A responder is bound to one role for its lifetime; the role's system
/// instructions are applied by the adapter that created it.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Send a prompt and get the reply text
    async fn respond(&self, prompt: &str) -> Result<String, ResponderError>;
}

#[async_trait]
impl<R: Responder + ?Sized> Responder for Box<R> {
    async fn respond(&self, prompt: &str) -> Result<String, ResponderError> {
        (**self).respond(prompt).await
    }
}

/// Gateway to a chat backend
///
/// This port defines how the application layer obtains responders.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Create a responder for `role` backed by `model`
    async fn create_responder(
        &self,
        model: &Model,
        role: AgentRole,
    ) -> Result<Box<dyn Responder>, ResponderError>;

    /// Models the backend can serve
    async fn available_models(&self) -> Result<Vec<Model>, ResponderError>;
}
