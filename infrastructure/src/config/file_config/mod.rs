//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.
//!
//! ```toml
//! [ollama]
//! base_url = "http://localhost:11434/v1"
//! model_name = "llama3.2:latest"
//! temperature = 0.7
//! max_tokens = 500
//! timeout = 30
//! max_turns = 5
//!
//! [generation]
//! timeout = 600
//!
//! [output]
//! format = "text"
//! color = true
//!
//! [logging]
//! conversation_log = "~/.local/state/slogan-gen/transcript.jsonl"
//! ```

mod generation;
mod logging;
mod ollama;
mod output;

pub use generation::FileGenerationConfig;
pub use logging::FileLoggingConfig;
pub use ollama::FileOllamaConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use slogan_application::GenerationConfig;
use slogan_domain::Model;
use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: String,
        max: String,
        value: String,
    },
}

impl ConfigValidationError {
    pub(crate) fn out_of_range<T: Display>(field: &'static str, min: T, max: T, value: T) -> Self {
        Self::OutOfRange {
            field,
            min: min.to_string(),
            max: max.to_string(),
            value: value.to_string(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat backend and loop defaults
    pub ollama: FileOllamaConfig,
    /// Whole-run limits
    pub generation: FileGenerationConfig,
    /// Console output settings
    pub output: FileOutputConfig,
    /// Diagnostic log and transcript files
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every violation found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        self.ollama.validate(&mut issues);
        self.generation.validate(&mut issues);
        issues
    }

    /// Build the immutable defaults shared by every run.
    pub fn generation_config(&self) -> Result<GenerationConfig, ConfigValidationError> {
        let model = Model::new(&self.ollama.model_name).map_err(|_| ConfigValidationError::Empty {
            field: "ollama.model_name",
        })?;
        Ok(GenerationConfig::default()
            .with_model(model)
            .with_max_turns(self.ollama.max_turns)
            .with_generation_timeout(Duration::from_secs(self.generation.timeout)))
    }
}
