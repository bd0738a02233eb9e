//! Configuration file loader with multi-source merging

use super::file_config::{ConfigValidationError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "slogan-gen";
const PROJECT_FILES: [&str; 2] = ["slogan-gen.toml", ".slogan-gen.toml"];
const OLLAMA_ENV_KEYS: [&str; 6] = [
    "base_url",
    "model_name",
    "temperature",
    "max_tokens",
    "timeout",
    "max_turns",
];
const GENERATION_TIMEOUT_ENV: &str = "SLOGAN_GENERATION_TIMEOUT";

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(
        "Invalid configuration:\n{}",
        .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n")
    )]
    Invalid(Vec<ConfigValidationError>),
}

/// Where a configuration layer comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub location: String,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `OLLAMA_*`, `SLOGAN_GENERATION_TIMEOUT`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./slogan-gen.toml` or `./.slogan-gen.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/slogan-gen/config.toml`
    /// 5. Default values
    ///
    /// The result is validated; any violation fails the load.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        if let Some(path) = config_path
            && !path.is_file()
        {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::extract(Self::file_figment(config_path))
    }

    /// Defaults plus environment only (for `--no-config`)
    pub fn load_defaults() -> Result<FileConfig, ConfigError> {
        Self::extract(Self::with_env(Self::defaults()))
    }

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(FileConfig::default()))
    }

    fn file_figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Self::defaults();

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment)
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(
                Env::prefixed("OLLAMA_")
                    .only(&OLLAMA_ENV_KEYS)
                    .map(|key| format!("ollama.{key}").into()),
            )
            .merge(
                Env::raw()
                    .only(&[GENERATION_TIMEOUT_ENV])
                    .map(|_| "generation.timeout".into()),
            )
    }

    fn extract(figment: Figment) -> Result<FileConfig, ConfigError> {
        let config: FileConfig = figment.extract().map_err(Box::new)?;
        let issues = config.validate();
        if issues.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/slogan-gen/config.toml if set,
    /// otherwise falls back to ~/.config/slogan-gen/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Config layers in priority order (highest first), for `config show`
    pub fn config_sources(config_path: Option<&Path>, no_config: bool) -> Vec<ConfigSource> {
        let mut sources = vec![ConfigSource {
            label: "Environment",
            location: format!("OLLAMA_*, {GENERATION_TIMEOUT_ENV}"),
            found: std::env::vars().any(|(key, _)| {
                key.starts_with("OLLAMA_") || key == GENERATION_TIMEOUT_ENV
            }),
        }];

        if !no_config {
            if let Some(path) = config_path {
                sources.push(ConfigSource {
                    label: "Explicit",
                    location: path.display().to_string(),
                    found: path.exists(),
                });
            }

            sources.push(match Self::project_config_path() {
                Some(path) => ConfigSource {
                    label: "Project",
                    location: path.display().to_string(),
                    found: true,
                },
                None => ConfigSource {
                    label: "Project",
                    location: PROJECT_FILES.map(|f| format!("./{f}")).join(" or "),
                    found: false,
                },
            });

            if let Some(path) = Self::global_config_path() {
                sources.push(ConfigSource {
                    label: "Global",
                    found: path.exists(),
                    location: path.display().to_string(),
                });
            }
        }

        sources.push(ConfigSource {
            label: "Default",
            location: "built-in defaults".to_string(),
            found: true,
        });
        sources
    }
}
