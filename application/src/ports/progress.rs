//! Progress notification port
//!
//! Defines the interface for reporting progress while the writer and
//! reviewer take turns.

use slogan_domain::CompletionReason;

/// Callback for progress updates during a generation run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called once before the first turn
    fn on_run_start(&self, _topic: &str, _max_turns: usize) {}

    /// Called when a turn starts (1-based)
    fn on_turn_start(&self, turn: usize, max_turns: usize);

    /// Called when the writer has produced a candidate
    fn on_slogan_proposed(&self, turn: usize, slogan: &str);

    /// Called when the reviewer has answered
    fn on_review_complete(&self, turn: usize, feedback: &str, approved: bool);

    /// Called when the session reached a terminal state
    fn on_run_complete(&self, _reason: CompletionReason, _turn_count: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_turn_start(&self, _turn: usize, _max_turns: usize) {}
    fn on_slogan_proposed(&self, _turn: usize, _slogan: &str) {}
    fn on_review_complete(&self, _turn: usize, _feedback: &str, _approved: bool) {}
}
