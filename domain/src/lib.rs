//! Domain layer for slogan-gen
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Writer / Reviewer loop
//!
//! A writer proposes a slogan, a reviewer critiques or approves it, and the
//! exchange repeats until approval or a turn cap:
//!
//! - **Turn**: one propose + critique exchange
//! - **IterationSession**: the ordered, validated record of all turns and
//!   the run's outcome
//! - **Approval**: the reviewer leads with, or puts on its own line, "SHIP IT!"

pub mod config;
pub mod core;
pub mod prompt;
pub mod review;
pub mod session;

// Re-export commonly used types
pub use config::OutputFormat;
pub use crate::core::{error::DomainError, model::Model, role::AgentRole, topic::Topic};
pub use prompt::PromptTemplate;
pub use review::{APPROVAL_PHRASE, is_approved};
pub use session::{
    completion::{CompletionReason, SessionStatus},
    continuation::ContinuationState,
    entities::{IterationSession, SessionRecord},
    turn::Turn,
};
