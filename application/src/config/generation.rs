//! Generation settings and per-run overrides.
//!
//! [`GenerationConfig`] is built once at startup and shared read-only.
//! A request never mutates it; instead [`GenerationConfig::resolve`] merges
//! the request's [`RunOverrides`] into a fresh [`EffectiveRunConfig`].

use slogan_domain::Model;
use std::time::Duration;

/// Defaults shared by every generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    model: Model,
    max_turns: usize,
    generation_timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            max_turns: Self::DEFAULT_MAX_TURNS,
            generation_timeout: Duration::from_secs(Self::DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }
}

impl GenerationConfig {
    pub const DEFAULT_MAX_TURNS: usize = 5;
    pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 600;

    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    // ==================== Accessors ====================

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn generation_timeout(&self) -> Duration {
        self.generation_timeout
    }

    /// Apply a request's overrides to a copy of these defaults
    pub fn resolve(&self, overrides: &RunOverrides) -> EffectiveRunConfig {
        EffectiveRunConfig {
            model: overrides
                .model
                .clone()
                .unwrap_or_else(|| self.model.clone()),
            max_turns: overrides.max_turns.unwrap_or(self.max_turns),
            generation_timeout: self.generation_timeout,
        }
    }
}

/// Values a single request may override.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    pub model: Option<Model>,
    pub max_turns: Option<usize>,
}

impl RunOverrides {
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.max_turns.is_none()
    }
}

/// Settings in force for exactly one run.
///
/// `max_turns` is not range-checked here; the iteration controller rejects
/// values outside 1..=10 as invalid input.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveRunConfig {
    pub model: Model,
    pub max_turns: usize,
    pub generation_timeout: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.model().as_str(), "llama3.2:latest");
        assert_eq!(config.max_turns(), 5);
        assert_eq!(config.generation_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_resolve_without_overrides_copies_defaults() {
        let config = GenerationConfig::default().with_max_turns(3);
        let effective = config.resolve(&RunOverrides::default());
        assert_eq!(effective.model, *config.model());
        assert_eq!(effective.max_turns, 3);
    }

    #[test]
    fn test_overrides_do_not_leak_into_shared_config() {
        let config = GenerationConfig::default();
        let overrides = RunOverrides::default()
            .with_model(Model::new("mistral:7b").unwrap())
            .with_max_turns(8);

        let effective = config.resolve(&overrides);
        assert_eq!(effective.model.as_str(), "mistral:7b");
        assert_eq!(effective.max_turns, 8);

        // The next run without overrides sees the original defaults
        let next = config.resolve(&RunOverrides::default());
        assert_eq!(next.model.as_str(), "llama3.2:latest");
        assert_eq!(next.max_turns, 5);
        assert_eq!(config, GenerationConfig::default());
    }

    #[test]
    fn test_run_overrides_is_empty() {
        assert!(RunOverrides::default().is_empty());
        assert!(!RunOverrides::default().with_max_turns(2).is_empty());
    }
}
