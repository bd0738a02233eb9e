//! Completion state of an iteration session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a session stopped iterating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The reviewer approved the latest slogan
    Approved,
    /// The turn cap was reached without approval
    MaxTurns,
    /// A responder or validation failure ended the run
    Error,
}

impl CompletionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionReason::Approved => "approved",
            CompletionReason::MaxTurns => "max_turns",
            CompletionReason::Error => "error",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CompletionReason::Approved => "Approved",
            CompletionReason::MaxTurns => "Max Turns",
            CompletionReason::Error => "Error",
        }
    }

    /// Approved and MaxTurns are both successful runs; only Error is not.
    pub fn is_success(&self) -> bool {
        !matches!(self, CompletionReason::Error)
    }
}

impl std::fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for CompletionReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "approved" => Ok(CompletionReason::Approved),
            "max_turns" => Ok(CompletionReason::MaxTurns),
            "error" => Ok(CompletionReason::Error),
            other => Err(format!("unknown completion reason: {}", other)),
        }
    }
}

/// Lifecycle of a session.
///
/// A single tagged value instead of a `completed` flag next to optional
/// reason/timestamp fields, so "completed without a reason" cannot be
/// represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Still iterating
    Pending,
    /// Loop terminated
    Completed {
        reason: CompletionReason,
        /// Slogan of the last turn; `None` only for an Error with no turns
        final_slogan: Option<String>,
        completed_at: DateTime<Utc>,
    },
}

impl SessionStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, SessionStatus::Completed { .. })
    }

    pub fn reason(&self) -> Option<CompletionReason> {
        match self {
            SessionStatus::Pending => None,
            SessionStatus::Completed { reason, .. } => Some(*reason),
        }
    }
}
