//! Chat backend adapter
//!
//! [`OllamaGateway`] implements the [`ChatGateway`](slogan_application::ChatGateway)
//! port over Ollama's OpenAI-compatible HTTP API using `reqwest`.

mod gateway;
mod protocol;

pub use gateway::{OllamaGateway, OllamaSettings};
