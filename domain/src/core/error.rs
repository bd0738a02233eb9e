//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Apart from [`DomainError::Cancelled`], every variant is a validation
/// failure of the session data model. Under correct controller logic they
/// only surface for bad responder output (e.g. an empty slogan) or for a
/// corrupted serialized session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid slogan: {0}")]
    InvalidSlogan(String),

    #[error("Invalid feedback: {0}")]
    InvalidFeedback(String),

    #[error("Turn limit exceeded: a session holds at most {max} turns")]
    TurnLimitExceeded { max: usize },

    #[error("Turn out of sequence: expected turn {expected}, found {found}")]
    TurnOutOfSequence { expected: usize, found: usize },

    #[error("Turn {turn} is timestamped before the previous turn")]
    TimestampOutOfOrder { turn: usize },

    #[error("Session is already completed")]
    SessionAlreadyCompleted,

    #[error("Inconsistent completion state: {0}")]
    InconsistentCompletion(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error is an invariant violation of the data model
    pub fn is_validation(&self) -> bool {
        !self.is_cancelled()
    }
}
