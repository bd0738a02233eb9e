//! Application layer for slogan-gen
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EffectiveRunConfig, GenerationConfig, RunOverrides};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, ProgressNotifier},
    responder::{ChatGateway, Responder, ResponderError},
};
pub use use_cases::generate_slogan::{
    GenerateSloganError, GenerateSloganInput, GenerateSloganOutput, GenerateSloganUseCase,
    GenerationReport, TurnDetail,
};
pub use use_cases::iteration::{ErrorKind, IterationController, IterationInput, RunError};
pub use use_cases::list_models::{ListModelsUseCase, ModelEntry};
