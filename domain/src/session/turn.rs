//! Turn value object: one writer/reviewer exchange

use crate::core::error::DomainError;
use crate::core::string::char_len;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One writer-propose + reviewer-critique exchange (Value Object)
///
/// Turns are only created by [`IterationSession::add_turn`], which assigns
/// the sequential number and timestamp.
///
/// [`IterationSession::add_turn`]: crate::session::entities::IterationSession::add_turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    turn_number: usize,
    slogan: String,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    approved: bool,
    timestamp: DateTime<Utc>,
}

impl Turn {
    /// Maximum slogan length in characters
    pub const MAX_SLOGAN_CHARS: usize = 500;
    /// Maximum feedback length in characters
    pub const MAX_FEEDBACK_CHARS: usize = 1000;

    pub(crate) fn new(
        turn_number: usize,
        slogan: String,
        feedback: Option<String>,
        approved: bool,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let turn = Self {
            turn_number,
            slogan,
            feedback,
            approved,
            timestamp,
        };
        turn.validate()?;
        Ok(turn)
    }

    /// Check the field constraints of this turn in isolation.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.turn_number == 0 {
            return Err(DomainError::TurnOutOfSequence {
                expected: 1,
                found: 0,
            });
        }
        if self.slogan.trim().is_empty() {
            return Err(DomainError::InvalidSlogan(format!(
                "turn {}: slogan cannot be empty",
                self.turn_number
            )));
        }
        let slogan_len = char_len(&self.slogan);
        if slogan_len > Self::MAX_SLOGAN_CHARS {
            return Err(DomainError::InvalidSlogan(format!(
                "turn {}: slogan is {} characters, at most {} allowed",
                self.turn_number,
                slogan_len,
                Self::MAX_SLOGAN_CHARS
            )));
        }
        if let Some(feedback) = &self.feedback {
            let feedback_len = char_len(feedback);
            if feedback_len > Self::MAX_FEEDBACK_CHARS {
                return Err(DomainError::InvalidFeedback(format!(
                    "turn {}: feedback is {} characters, at most {} allowed",
                    self.turn_number,
                    feedback_len,
                    Self::MAX_FEEDBACK_CHARS
                )));
            }
        }
        Ok(())
    }

    pub fn turn_number(&self) -> usize {
        self.turn_number
    }

    pub fn slogan(&self) -> &str {
        &self.slogan
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn approved(&self) -> bool {
        self.approved
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(slogan: &str, feedback: Option<&str>) -> Result<Turn, DomainError> {
        Turn::new(1, slogan.to_string(), feedback.map(String::from), false, Utc::now())
    }

    #[test]
    fn test_valid_turn() {
        let t = turn("Drink Green", Some("Needs more emotional appeal")).unwrap();
        assert_eq!(t.turn_number(), 1);
        assert_eq!(t.slogan(), "Drink Green");
        assert_eq!(t.feedback(), Some("Needs more emotional appeal"));
        assert!(!t.approved());
    }

    #[test]
    fn test_empty_slogan_rejected() {
        assert!(matches!(turn("", None), Err(DomainError::InvalidSlogan(_))));
        assert!(matches!(turn("  ", None), Err(DomainError::InvalidSlogan(_))));
    }

    #[test]
    fn test_slogan_length_limit() {
        assert!(turn(&"s".repeat(Turn::MAX_SLOGAN_CHARS), None).is_ok());
        assert!(matches!(
            turn(&"s".repeat(Turn::MAX_SLOGAN_CHARS + 1), None),
            Err(DomainError::InvalidSlogan(_))
        ));
    }

    #[test]
    fn test_feedback_length_limit() {
        let long = "f".repeat(Turn::MAX_FEEDBACK_CHARS + 1);
        assert!(matches!(
            turn("Drink Green", Some(&long)),
            Err(DomainError::InvalidFeedback(_))
        ));
        assert!(turn("Drink Green", None).is_ok());
    }

    #[test]
    fn test_zero_turn_number_rejected() {
        let result = Turn::new(0, "Drink Green".to_string(), None, false, Utc::now());
        assert!(matches!(
            result,
            Err(DomainError::TurnOutOfSequence { expected: 1, found: 0 })
        ));
    }
}
