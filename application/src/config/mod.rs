//! Application-level configuration.
//!
//! - [`GenerationConfig`]: the immutable defaults shared by every run
//! - [`RunOverrides`]: what a single request may change
//! - [`EffectiveRunConfig`]: the run-scoped result of applying overrides

pub mod generation;

pub use generation::{EffectiveRunConfig, GenerationConfig, RunOverrides};
