//! Iteration session entity: the validated, append-only turn ledger

use crate::core::error::DomainError;
use crate::core::model::Model;
use crate::core::topic::Topic;
use crate::session::completion::{CompletionReason, SessionStatus};
use crate::session::turn::Turn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one end-to-end slogan generation run (Entity)
///
/// Owned and mutated by the iteration controller while a run is in
/// progress; callers receive it afterwards as a read-only result.
///
/// Invariants, checked on every mutation and on deserialization:
/// - `turns[i].turn_number() == i + 1`, at most [`Self::MAX_TURNS`] turns
/// - turn timestamps never decrease
/// - only the last turn may be approved
/// - a completed session has a reason, `completed_at >= started_at`, and
///   its final slogan is the last turn's slogan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub struct IterationSession {
    user_input: Topic,
    model_name: Model,
    turns: Vec<Turn>,
    status: SessionStatus,
    started_at: DateTime<Utc>,
}

impl IterationSession {
    /// Hard cap on turns per session
    pub const MAX_TURNS: usize = 10;

    pub fn new(user_input: Topic, model_name: Model) -> Self {
        Self {
            user_input,
            model_name,
            turns: Vec::new(),
            status: SessionStatus::Pending,
            started_at: Utc::now(),
        }
    }

    // ==================== Accessors ====================

    pub fn user_input(&self) -> &Topic {
        &self.user_input
    }

    pub fn model_name(&self) -> &Model {
        &self.model_name
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    pub fn completion_reason(&self) -> Option<CompletionReason> {
        self.status.reason()
    }

    pub fn final_slogan(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Completed { final_slogan, .. } => final_slogan.as_deref(),
            SessionStatus::Pending => None,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match &self.status {
            SessionStatus::Completed { completed_at, .. } => Some(*completed_at),
            SessionStatus::Pending => None,
        }
    }

    /// Wall-clock duration of a completed session
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at().map(|end| end - self.started_at)
    }

    /// Mean duration per turn; zero when there are no turns
    pub fn average_turn_duration(&self) -> Option<chrono::Duration> {
        let total = self.duration()?;
        match i32::try_from(self.turns.len()) {
            Ok(0) | Err(_) => Some(chrono::Duration::zero()),
            Ok(n) => Some(total / n),
        }
    }

    // ==================== Mutations ====================

    /// Append the next turn.
    ///
    /// The turn number is always `turn_count() + 1`. Fails when the session
    /// is already completed, when the cap of [`Self::MAX_TURNS`] would be
    /// exceeded, or when the slogan/feedback violate their constraints.
    pub fn add_turn(
        &mut self,
        slogan: impl Into<String>,
        feedback: Option<String>,
        approved: bool,
    ) -> Result<&Turn, DomainError> {
        if self.is_completed() {
            return Err(DomainError::SessionAlreadyCompleted);
        }
        if self.turns.len() >= Self::MAX_TURNS {
            return Err(DomainError::TurnLimitExceeded {
                max: Self::MAX_TURNS,
            });
        }
        if let Some(last) = self.turns.last()
            && last.approved()
        {
            return Err(DomainError::InconsistentCompletion(format!(
                "turn {} was already approved",
                last.turn_number()
            )));
        }

        let floor = self
            .turns
            .last()
            .map_or(self.started_at, |t| t.timestamp());
        let timestamp = Utc::now().max(floor);

        let turn = Turn::new(
            self.turns.len() + 1,
            slogan.into(),
            feedback,
            approved,
            timestamp,
        )?;
        self.turns.push(turn);
        Ok(&self.turns[self.turns.len() - 1])
    }

    /// Mark the session complete.
    ///
    /// The final slogan is taken from the last turn. An `Error` completion
    /// may have no turns at all (the first writer call failed); `Approved`
    /// and `MaxTurns` always need at least one turn.
    pub fn complete(&mut self, reason: CompletionReason) -> Result<(), DomainError> {
        if self.is_completed() {
            return Err(DomainError::SessionAlreadyCompleted);
        }

        let floor = self
            .turns
            .last()
            .map_or(self.started_at, |t| t.timestamp());

        let status = SessionStatus::Completed {
            reason,
            final_slogan: self.turns.last().map(|t| t.slogan().to_string()),
            completed_at: Utc::now().max(floor),
        };
        Self::check_completion(&self.turns, &status, self.started_at)?;
        self.status = status;
        Ok(())
    }

    // ==================== Validation ====================

    /// Re-check every invariant of the ledger.
    pub fn validate(&self) -> Result<(), DomainError> {
        Self::check_turns(&self.turns)?;
        Self::check_completion(&self.turns, &self.status, self.started_at)
    }

    fn check_turns(turns: &[Turn]) -> Result<(), DomainError> {
        if turns.len() > Self::MAX_TURNS {
            return Err(DomainError::TurnLimitExceeded {
                max: Self::MAX_TURNS,
            });
        }

        let mut previous: Option<&Turn> = None;
        for (i, turn) in turns.iter().enumerate() {
            let expected = i + 1;
            if turn.turn_number() != expected {
                return Err(DomainError::TurnOutOfSequence {
                    expected,
                    found: turn.turn_number(),
                });
            }
            turn.validate()?;

            if let Some(prev) = previous {
                if turn.timestamp() < prev.timestamp() {
                    return Err(DomainError::TimestampOutOfOrder {
                        turn: turn.turn_number(),
                    });
                }
                if prev.approved() {
                    return Err(DomainError::InconsistentCompletion(format!(
                        "turn {} follows approved turn {}",
                        turn.turn_number(),
                        prev.turn_number()
                    )));
                }
            }
            previous = Some(turn);
        }
        Ok(())
    }

    fn check_completion(
        turns: &[Turn],
        status: &SessionStatus,
        started_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let SessionStatus::Completed {
            reason,
            final_slogan,
            completed_at,
        } = status
        else {
            return Ok(());
        };

        if *completed_at < started_at {
            return Err(DomainError::InconsistentCompletion(
                "completed_at is before started_at".to_string(),
            ));
        }

        let last = turns.last();
        if final_slogan.as_deref() != last.map(|t| t.slogan()) {
            return Err(DomainError::InconsistentCompletion(
                "final slogan must equal the last turn's slogan".to_string(),
            ));
        }

        match (reason, last) {
            (CompletionReason::Approved | CompletionReason::MaxTurns, None) => {
                Err(DomainError::InconsistentCompletion(format!(
                    "{} completion requires at least one turn",
                    reason.as_str()
                )))
            }
            (CompletionReason::Approved, Some(turn)) if !turn.approved() => {
                Err(DomainError::InconsistentCompletion(
                    "approved completion requires an approved last turn".to_string(),
                ))
            }
            (CompletionReason::MaxTurns, Some(turn)) if turn.approved() => {
                Err(DomainError::InconsistentCompletion(
                    "max_turns completion with an approved last turn".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Flat serialized shape of a session.
///
/// Mirrors the fields callers expect in saved JSON (`completed`,
/// `completion_reason`, `final_slogan`, ...). Converting back into an
/// [`IterationSession`] re-validates everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_input: String,
    pub model_name: String,
    #[serde(default)]
    pub turns: Vec<Turn>,
    #[serde(default)]
    pub final_slogan: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completion_reason: Option<CompletionReason>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<IterationSession> for SessionRecord {
    fn from(session: IterationSession) -> Self {
        let (completed, completion_reason, final_slogan, completed_at) = match session.status {
            SessionStatus::Pending => (false, None, None, None),
            SessionStatus::Completed {
                reason,
                final_slogan,
                completed_at,
            } => (true, Some(reason), final_slogan, Some(completed_at)),
        };

        Self {
            user_input: session.user_input.into_content(),
            model_name: session.model_name.to_string(),
            turns: session.turns,
            final_slogan,
            completed,
            completion_reason,
            started_at: session.started_at,
            completed_at,
        }
    }
}

impl TryFrom<SessionRecord> for IterationSession {
    type Error = DomainError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        let status = match (record.completed, record.completion_reason, record.completed_at) {
            (false, None, None) if record.final_slogan.is_none() => SessionStatus::Pending,
            (false, _, _) => {
                return Err(DomainError::InconsistentCompletion(
                    "pending session carries completion fields".to_string(),
                ));
            }
            (true, Some(reason), Some(completed_at)) => SessionStatus::Completed {
                reason,
                final_slogan: record.final_slogan,
                completed_at,
            },
            (true, None, _) => {
                return Err(DomainError::InconsistentCompletion(
                    "completed session must have a completion_reason".to_string(),
                ));
            }
            (true, Some(_), None) => {
                return Err(DomainError::InconsistentCompletion(
                    "completed session must have completed_at".to_string(),
                ));
            }
        };

        let session = Self {
            user_input: Topic::new(record.user_input)?,
            model_name: Model::new(record.model_name)?,
            turns: record.turns,
            status,
            started_at: record.started_at,
        };
        session.validate()?;
        Ok(session)
    }
}
