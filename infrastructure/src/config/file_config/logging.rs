//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw `[logging]` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write diagnostic logs to this file
    pub file: Option<String>,
    /// Append a JSONL transcript of every run to this file
    pub conversation_log: Option<String>,
}
