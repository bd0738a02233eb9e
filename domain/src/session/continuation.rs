//! Continuation decision for the writer/reviewer loop

use crate::session::entities::IterationSession;

/// Where a session stands before the next turn.
///
/// ```text
/// NoTurnsYet ──turn──▶ InProgressUnapproved ──turn──▶ ...
///      │                        │
///      │ approved turn          │ len >= max_turns
///      ▼                        ▼
///   Approved              MaxTurnsReached
/// ```
///
/// Approval always wins over the cap: a session whose last turn was
/// approved is `Approved` even when it also hit `max_turns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationState {
    NoTurnsYet,
    InProgressUnapproved,
    Approved,
    MaxTurnsReached,
}

impl ContinuationState {
    /// Classify the session against the run's turn cap.
    ///
    /// `max_turns` is clamped to `1..=IterationSession::MAX_TURNS`.
    pub fn evaluate(session: &IterationSession, max_turns: usize) -> Self {
        let max_turns = max_turns.clamp(1, IterationSession::MAX_TURNS);
        match session.last_turn() {
            None => ContinuationState::NoTurnsYet,
            Some(turn) if turn.approved() => ContinuationState::Approved,
            Some(_) if session.turn_count() >= max_turns => ContinuationState::MaxTurnsReached,
            Some(_) => ContinuationState::InProgressUnapproved,
        }
    }

    /// Whether the loop should produce another turn
    pub fn should_continue(&self) -> bool {
        matches!(
            self,
            ContinuationState::NoTurnsYet | ContinuationState::InProgressUnapproved
        )
    }

    pub fn is_terminal(&self) -> bool {
        !self.should_continue()
    }
}
