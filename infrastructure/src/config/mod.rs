//! Configuration file loading for slogan-gen
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables (`OLLAMA_*`, `SLOGAN_GENERATION_TIMEOUT`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./slogan-gen.toml` or `./.slogan-gen.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/slogan-gen/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGenerationConfig, FileLoggingConfig, FileOllamaConfig,
    FileOutputConfig,
};
pub use loader::{ConfigError, ConfigLoader, ConfigSource};
