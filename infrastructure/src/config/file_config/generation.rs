//! Generation configuration from TOML (`[generation]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};

/// Raw `[generation]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Upper bound for a whole run in seconds (60 - 1800).
    /// Overridden by `SLOGAN_GENERATION_TIMEOUT`.
    pub timeout: u64,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self { timeout: 600 }
    }
}

impl FileGenerationConfig {
    pub(super) fn validate(&self, issues: &mut Vec<ConfigValidationError>) {
        if !(60..=1800).contains(&self.timeout) {
            issues.push(ConfigValidationError::out_of_range(
                "generation.timeout",
                60,
                1800,
                self.timeout,
            ));
        }
    }
}
