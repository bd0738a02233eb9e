//! Infrastructure layer for slogan-gen
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod ollama;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, ConfigSource, ConfigValidationError, FileConfig,
    FileGenerationConfig, FileLoggingConfig, FileOllamaConfig, FileOutputConfig,
};
pub use logging::JsonlConversationLogger;
pub use ollama::{OllamaGateway, OllamaSettings};
