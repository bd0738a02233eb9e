//! Chat backend configuration from TOML (`[ollama]` section)
//!
//! Every field can also come from an `OLLAMA_*` environment variable
//! (`OLLAMA_BASE_URL`, `OLLAMA_MODEL_NAME`, ...), see
//! [`ConfigLoader`](crate::config::ConfigLoader).

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use slogan_domain::Model;

/// Raw `[ollama]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    /// OpenAI-compatible API root, e.g. `http://localhost:11434/v1`
    pub base_url: String,
    /// Default model for both roles
    pub model_name: String,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f64,
    /// Maximum tokens per reply (1 - 4096)
    pub max_tokens: u32,
    /// Per-request timeout in seconds (1 - 300)
    pub timeout: u64,
    /// Default turn cap (1 - 10)
    pub max_turns: usize,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model_name: Model::DEFAULT_NAME.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout: 30,
            max_turns: 5,
        }
    }
}

impl FileOllamaConfig {
    pub(super) fn validate(&self, issues: &mut Vec<ConfigValidationError>) {
        if self.base_url.trim().is_empty() {
            issues.push(ConfigValidationError::Empty {
                field: "ollama.base_url",
            });
        }
        if self.model_name.trim().is_empty() {
            issues.push(ConfigValidationError::Empty {
                field: "ollama.model_name",
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigValidationError::out_of_range(
                "ollama.temperature",
                0.0,
                2.0,
                self.temperature,
            ));
        }
        if !(1..=4096).contains(&self.max_tokens) {
            issues.push(ConfigValidationError::out_of_range(
                "ollama.max_tokens",
                1,
                4096,
                self.max_tokens,
            ));
        }
        if !(1..=300).contains(&self.timeout) {
            issues.push(ConfigValidationError::out_of_range(
                "ollama.timeout",
                1,
                300,
                self.timeout,
            ));
        }
        if !(1..=10).contains(&self.max_turns) {
            issues.push(ConfigValidationError::out_of_range(
                "ollama.max_turns",
                1,
                10,
                self.max_turns,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;

    #[test]
    fn test_ollama_section_deserialize() {
        let toml_str = r#"
[ollama]
base_url = "http://gpu-box:11434/v1"
model_name = "mistral:latest"
temperature = 1.2
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ollama.base_url, "http://gpu-box:11434/v1");
        assert_eq!(config.ollama.model_name, "mistral:latest");
        assert_eq!(config.ollama.temperature, 1.2);
        // Unset fields keep their defaults
        assert_eq!(config.ollama.max_tokens, 500);
        assert_eq!(config.ollama.max_turns, 5);
    }

    #[test]
    fn test_out_of_range_values_are_all_reported() {
        let toml_str = r#"
[ollama]
temperature = 3.5
max_tokens = 0
timeout = 301
max_turns = 11
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert!(issues[0].to_string().contains("ollama.temperature"));
        assert!(issues[3].to_string().contains("between 1 and 10, got 11"));
    }
}
