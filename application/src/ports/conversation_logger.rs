//! Port for the structured conversation transcript.
//!
//! `tracing` carries diagnostics; this port records what was said to and by
//! each role, one event per prompt, reply and outcome, so a run can be
//! replayed from a JSONL file.

use serde_json::{Value, json};
use slogan_domain::{AgentRole, CompletionReason};

/// One transcript entry.
pub struct ConversationEvent {
    /// Event type identifier (`"prompt"`, `"response"`, `"run_completed"`, ...).
    pub event_type: &'static str,
    /// Event-specific fields.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn run_started(topic: &str, model: &str, max_turns: usize) -> Self {
        Self::new(
            "run_started",
            json!({ "topic": topic, "model": model, "max_turns": max_turns }),
        )
    }

    pub fn prompt(role: AgentRole, turn: usize, text: &str) -> Self {
        Self::new(
            "prompt",
            json!({ "role": role.as_str(), "turn": turn, "text": text }),
        )
    }

    pub fn response(role: AgentRole, turn: usize, text: &str) -> Self {
        Self::new(
            "response",
            json!({ "role": role.as_str(), "turn": turn, "text": text }),
        )
    }

    pub fn run_completed(
        reason: CompletionReason,
        turn_count: usize,
        final_slogan: Option<&str>,
    ) -> Self {
        Self::new(
            "run_completed",
            json!({
                "reason": reason.as_str(),
                "turn_count": turn_count,
                "final_slogan": final_slogan,
            }),
        )
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible; adapters swallow their own write
/// failures so the run is never interrupted by the transcript.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Logger used when no transcript is requested.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
