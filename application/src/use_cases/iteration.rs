//! Iteration controller
//!
//! Drives the writer/reviewer loop for one topic and records every exchange
//! in an [`IterationSession`].
//!
//! ```text
//! ┌────────────┐ prompt  ┌────────┐ slogan  ┌──────────┐ feedback
//! │ controller │───────▶│ writer │───────▶│ reviewer │──────────┐
//! └────────────┘         └────────┘         └──────────┘          │
//!       ▲                                                         │
//!       └──── add_turn ◀── is_approved ◀───────────────────────────┘
//! ```
//!
//! The loop ends when the reviewer approves, when the turn cap is reached,
//! or with an error. Whatever the outcome, the session is completed exactly
//! once before it leaves the controller.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::responder::{Responder, ResponderError};
use slogan_domain::{
    AgentRole, CompletionReason, ContinuationState, DomainError, IterationSession, Model,
    PromptTemplate, Topic, Turn, is_approved,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Coarse classification of a failed run.
///
/// Callers branch on this instead of matching error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself was unusable (blank topic, bad turn count, unknown model)
    InvalidInput,
    /// The chat backend is down or does not serve the model
    BackendUnavailable,
    /// The backend answered with an error or an unusable reply
    ResponderFailure,
    /// The session ledger refused a mutation the controller made
    ValidationFailure,
    /// The run or a single request exceeded its time limit
    Timeout,
    /// The run was cancelled by the caller
    Cancelled,
}

/// Errors that can end a run
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A responder call failed. The session, completed as `Error`, is kept
    /// for diagnostics only.
    #[error("{phase} failed on turn {turn}: {source}")]
    Responder {
        phase: AgentRole,
        turn: usize,
        #[source]
        source: ResponderError,
        session: Box<IterationSession>,
    },

    /// The ledger refused a checked reply. Not expected in normal runs.
    #[error("Session validation failed: {source}")]
    Validation {
        #[source]
        source: DomainError,
        session: Box<IterationSession>,
    },

    #[error("Generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::InvalidInput(_) => ErrorKind::InvalidInput,
            RunError::Responder { source, .. } => match source {
                ResponderError::Timeout => ErrorKind::Timeout,
                e if e.is_backend_unavailable() => ErrorKind::BackendUnavailable,
                _ => ErrorKind::ResponderFailure,
            },
            RunError::Validation { .. } => ErrorKind::ValidationFailure,
            RunError::Timeout(_) => ErrorKind::Timeout,
            RunError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunError::Cancelled)
    }

    /// The partially filled session, when the failure happened mid-run
    pub fn session(&self) -> Option<&IterationSession> {
        match self {
            RunError::Responder { session, .. } | RunError::Validation { session, .. } => {
                Some(session)
            }
            _ => None,
        }
    }
}

/// Input for one run of the controller
#[derive(Debug, Clone)]
pub struct IterationInput {
    /// Product or service description
    pub user_input: String,
    /// Model backing both roles; recorded in the session
    pub model_name: String,
    /// Turn cap for this run; `None` uses the controller default
    pub max_turns: Option<usize>,
}

impl IterationInput {
    pub fn new(user_input: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            model_name: model_name.into(),
            max_turns: None,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }
}

/// Why the loop stopped early. Converted into [`RunError`] once the
/// session is no longer borrowed by the loop.
enum Halt {
    Responder {
        phase: AgentRole,
        turn: usize,
        source: ResponderError,
    },
    Validation(DomainError),
    Cancelled,
}

/// Runs the writer/reviewer loop
pub struct IterationController {
    default_max_turns: usize,
    generation_timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Default for IterationController {
    fn default() -> Self {
        Self::new()
    }
}

impl IterationController {
    pub const DEFAULT_MAX_TURNS: usize = 5;

    pub fn new() -> Self {
        Self {
            default_max_turns: Self::DEFAULT_MAX_TURNS,
            generation_timeout: None,
            cancellation: None,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_default_max_turns(mut self, max_turns: usize) -> Self {
        self.default_max_turns = max_turns;
        self
    }

    /// Bound the whole run; exceeding it yields [`RunError::Timeout`]
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    // ==================== Execution ====================

    /// Run with default (no-op) progress
    pub async fn run(
        &self,
        input: IterationInput,
        writer: &dyn Responder,
        reviewer: &dyn Responder,
    ) -> Result<IterationSession, RunError> {
        self.run_with_progress(input, writer, reviewer, &NoProgress)
            .await
    }

    /// Run with progress callbacks
    pub async fn run_with_progress(
        &self,
        input: IterationInput,
        writer: &dyn Responder,
        reviewer: &dyn Responder,
        progress: &dyn ProgressNotifier,
    ) -> Result<IterationSession, RunError> {
        let topic =
            Topic::new(input.user_input).map_err(|e| RunError::InvalidInput(e.to_string()))?;
        let model =
            Model::new(input.model_name).map_err(|e| RunError::InvalidInput(e.to_string()))?;
        let max_turns = self.resolve_max_turns(input.max_turns)?;

        info!(
            model = %model,
            max_turns,
            "Starting slogan generation"
        );
        progress.on_run_start(topic.content(), max_turns);
        self.conversation_logger.log(ConversationEvent::run_started(
            topic.content(),
            model.as_str(),
            max_turns,
        ));

        let mut session = IterationSession::new(topic, model);

        let outcome = match self.generation_timeout {
            Some(limit) => {
                match tokio::time::timeout(
                    limit,
                    self.drive(&mut session, max_turns, writer, reviewer, progress),
                )
                .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(
                            turns = session.turn_count(),
                            "Generation timed out after {}s",
                            limit.as_secs()
                        );
                        return Err(RunError::Timeout(limit));
                    }
                }
            }
            None => {
                self.drive(&mut session, max_turns, writer, reviewer, progress)
                    .await
            }
        };

        match outcome {
            Ok(()) => {
                if let Some(reason) = session.completion_reason() {
                    info!(
                        reason = reason.as_str(),
                        turns = session.turn_count(),
                        "Slogan generation finished"
                    );
                    progress.on_run_complete(reason, session.turn_count());
                }
                Ok(session)
            }
            Err(Halt::Cancelled) => {
                info!(turns = session.turn_count(), "Slogan generation cancelled");
                Err(RunError::Cancelled)
            }
            Err(Halt::Responder {
                phase,
                turn,
                source,
            }) => {
                warn!(%phase, turn, error = %source, "Responder failed");
                self.mark_failed(&mut session, progress);
                Err(RunError::Responder {
                    phase,
                    turn,
                    source,
                    session: Box::new(session),
                })
            }
            Err(Halt::Validation(source)) => {
                warn!(error = %source, "Responder output rejected by session");
                self.mark_failed(&mut session, progress);
                Err(RunError::Validation {
                    source,
                    session: Box::new(session),
                })
            }
        }
    }

    fn resolve_max_turns(&self, requested: Option<usize>) -> Result<usize, RunError> {
        let max_turns = requested.unwrap_or(self.default_max_turns);
        if !(1..=IterationSession::MAX_TURNS).contains(&max_turns) {
            return Err(RunError::InvalidInput(format!(
                "max_turns must be between 1 and {}, got {}",
                IterationSession::MAX_TURNS,
                max_turns
            )));
        }
        Ok(max_turns)
    }

    /// The loop proper. On `Ok` the session is completed.
    async fn drive(
        &self,
        session: &mut IterationSession,
        max_turns: usize,
        writer: &dyn Responder,
        reviewer: &dyn Responder,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), Halt> {
        loop {
            match ContinuationState::evaluate(session, max_turns) {
                ContinuationState::Approved => {
                    return self.finish(session, CompletionReason::Approved);
                }
                ContinuationState::MaxTurnsReached => {
                    return self.finish(session, CompletionReason::MaxTurns);
                }
                ContinuationState::NoTurnsYet | ContinuationState::InProgressUnapproved => {}
            }

            let turn = session.turn_count() + 1;
            let topic = session.user_input().content();
            debug!(turn, max_turns, "Starting turn");
            progress.on_turn_start(turn, max_turns);

            let writer_prompt = match session.last_turn() {
                None => PromptTemplate::writer_initial(topic),
                Some(previous) => PromptTemplate::writer_revision(
                    topic,
                    previous.slogan(),
                    previous.feedback(),
                ),
            };
            let slogan = self
                .ask(writer, AgentRole::Writer, turn, &writer_prompt)
                .await?
                .trim()
                .to_string();
            check_reply(AgentRole::Writer, turn, &slogan)?;
            progress.on_slogan_proposed(turn, &slogan);

            let review_prompt = PromptTemplate::review_prompt(topic, &slogan);
            let feedback = self
                .ask(reviewer, AgentRole::Reviewer, turn, &review_prompt)
                .await?
                .trim()
                .to_string();
            check_reply(AgentRole::Reviewer, turn, &feedback)?;

            let approved = is_approved(&feedback);
            debug!(turn, approved, "Review received");
            progress.on_review_complete(turn, &feedback, approved);

            let feedback = (!feedback.is_empty()).then_some(feedback);
            session
                .add_turn(slogan, feedback, approved)
                .map_err(Halt::Validation)?;
        }
    }

    /// One responder call, abandoned as soon as cancellation is requested.
    async fn ask(
        &self,
        responder: &dyn Responder,
        role: AgentRole,
        turn: usize,
        prompt: &str,
    ) -> Result<String, Halt> {
        self.conversation_logger
            .log(ConversationEvent::prompt(role, turn, prompt));

        let result = if let Some(token) = &self.cancellation {
            if token.is_cancelled() {
                return Err(Halt::Cancelled);
            }
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(Halt::Cancelled),
                result = responder.respond(prompt) => result,
            }
        } else {
            responder.respond(prompt).await
        };

        let text = result.map_err(|source| Halt::Responder {
            phase: role,
            turn,
            source,
        })?;
        self.conversation_logger
            .log(ConversationEvent::response(role, turn, &text));
        Ok(text)
    }

    fn finish(&self, session: &mut IterationSession, reason: CompletionReason) -> Result<(), Halt> {
        session.complete(reason).map_err(Halt::Validation)?;
        self.conversation_logger.log(ConversationEvent::run_completed(
            reason,
            session.turn_count(),
            session.final_slogan(),
        ));
        Ok(())
    }

    fn mark_failed(&self, session: &mut IterationSession, progress: &dyn ProgressNotifier) {
        if let Err(e) = session.complete(CompletionReason::Error) {
            warn!(error = %e, "Could not mark session as failed");
            return;
        }
        self.conversation_logger.log(ConversationEvent::run_completed(
            CompletionReason::Error,
            session.turn_count(),
            session.final_slogan(),
        ));
        progress.on_run_complete(CompletionReason::Error, session.turn_count());
    }
}

/// Reject replies the ledger cannot hold. Slogans must be non-empty and at
/// most [`Turn::MAX_SLOGAN_CHARS`]; feedback at most [`Turn::MAX_FEEDBACK_CHARS`].
fn check_reply(role: AgentRole, turn: usize, text: &str) -> Result<(), Halt> {
    let (limit, what) = match role {
        AgentRole::Writer => (Turn::MAX_SLOGAN_CHARS, "slogan"),
        AgentRole::Reviewer => (Turn::MAX_FEEDBACK_CHARS, "feedback"),
    };
    let len = text.chars().count();
    let problem = if role == AgentRole::Writer && len == 0 {
        Some(format!("empty {what}"))
    } else if len > limit {
        Some(format!("{what} is {len} characters, at most {limit} allowed"))
    } else {
        None
    };

    match problem {
        Some(message) => Err(Halt::Responder {
            phase: role,
            turn,
            source: ResponderError::InvalidResponse(message),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted responder: pops replies in order, then repeats `fallback`.
    pub(crate) struct MockResponder {
        replies: Mutex<VecDeque<Result<String, ResponderError>>>,
        fallback: Option<String>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl MockResponder {
        pub(crate) fn always(reply: &str) -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                fallback: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        pub(crate) fn scripted(replies: Vec<Result<&str, ResponderError>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
                fallback: None,
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Responder for MockResponder {
        async fn respond(&self, prompt: &str) -> Result<String, ResponderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let scripted = self.replies.lock().unwrap().pop_front();
            match scripted {
                Some(reply) => reply,
                None => self
                    .fallback
                    .clone()
                    .ok_or_else(|| ResponderError::Other("No more responses".to_string())),
            }
        }
    }

    fn input(topic: &str) -> IterationInput {
        IterationInput::new(topic, "llama3.2:latest")
    }

    // ==================== Outcomes ====================

    #[tokio::test]
    async fn test_never_approved_runs_to_max_turns() {
        let writer = MockResponder::always("Drink Green");
        let reviewer = MockResponder::always("Needs more emotional appeal");

        let session = IterationController::new()
            .run(
                input("eco-friendly water bottle").with_max_turns(3),
                &writer,
                &reviewer,
            )
            .await
            .unwrap();

        assert_eq!(session.turn_count(), 3);
        assert!(session.turns().iter().all(|t| !t.approved()));
        assert_eq!(session.completion_reason(), Some(CompletionReason::MaxTurns));
        assert_eq!(session.final_slogan(), Some("Drink Green"));
        assert_eq!(writer.calls(), 3);
        assert_eq!(reviewer.calls(), 3);
    }

    #[tokio::test]
    async fn test_first_turn_approval_stops_loop() {
        let writer = MockResponder::always("Hydrate Now");
        let reviewer = MockResponder::always("SHIP IT! Great work.");

        let session = IterationController::new()
            .run(input("eco-friendly water bottle"), &writer, &reviewer)
            .await
            .unwrap();

        assert_eq!(session.turn_count(), 1);
        assert!(session.turns()[0].approved());
        assert_eq!(session.completion_reason(), Some(CompletionReason::Approved));
        assert_eq!(session.final_slogan(), Some("Hydrate Now"));
        assert_eq!(writer.calls(), 1);
    }

    #[tokio::test]
    async fn test_trailing_mention_is_not_approval() {
        let writer = MockResponder::always("Cloud power");
        let reviewer = MockResponder::scripted(vec![
            Ok("This is excellent, ship it!"),
            Ok("ship   it"),
        ]);

        let session = IterationController::new()
            .run(input("cloud platform"), &writer, &reviewer)
            .await
            .unwrap();

        assert_eq!(session.turn_count(), 2);
        assert!(!session.turns()[0].approved());
        assert!(session.turns()[1].approved());
        assert_eq!(session.completion_reason(), Some(CompletionReason::Approved));
    }

    #[tokio::test]
    async fn test_blank_topic_never_calls_responders() {
        for topic in ["", "   "] {
            let writer = MockResponder::always("unused");
            let reviewer = MockResponder::always("unused");

            let err = IterationController::new()
                .run(input(topic), &writer, &reviewer)
                .await
                .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::InvalidInput);
            assert_eq!(writer.calls(), 0);
            assert_eq!(reviewer.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_blank_model_is_invalid_input() {
        let writer = MockResponder::always("unused");
        let reviewer = MockResponder::always("unused");
        let err = IterationController::new()
            .run(IterationInput::new("bottle", " "), &writer, &reviewer)
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::InvalidInput(_)));
    }

    // ==================== Turn cap ====================

    #[tokio::test]
    async fn test_max_turns_bounds() {
        for max_turns in [1, 10] {
            let writer = MockResponder::always("Drink Green");
            let reviewer = MockResponder::always("Try again");
            let session = IterationController::new()
                .run(input("bottle").with_max_turns(max_turns), &writer, &reviewer)
                .await
                .unwrap();
            assert_eq!(session.turn_count(), max_turns);
            assert_eq!(session.completion_reason(), Some(CompletionReason::MaxTurns));
        }
    }

    #[tokio::test]
    async fn test_max_turns_out_of_range_is_invalid_input() {
        for max_turns in [0, 11] {
            let writer = MockResponder::always("Drink Green");
            let reviewer = MockResponder::always("Try again");
            let err = IterationController::new()
                .run(input("bottle").with_max_turns(max_turns), &writer, &reviewer)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
            assert_eq!(writer.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_default_max_turns_applies_when_unset() {
        let writer = MockResponder::always("Drink Green");
        let reviewer = MockResponder::always("Try again");
        let session = IterationController::new()
            .with_default_max_turns(2)
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap();
        assert_eq!(session.turn_count(), 2);
    }

    #[tokio::test]
    async fn test_approval_on_last_allowed_turn_is_approved() {
        let writer = MockResponder::always("Drink Green");
        let reviewer = MockResponder::scripted(vec![Ok("Meh"), Ok("SHIP IT!")]);
        let session = IterationController::new()
            .run(input("bottle").with_max_turns(2), &writer, &reviewer)
            .await
            .unwrap();
        assert_eq!(session.completion_reason(), Some(CompletionReason::Approved));
    }

    // ==================== Prompt chaining ====================

    #[tokio::test]
    async fn test_feedback_reaches_next_writer_prompt() {
        let writer = MockResponder::scripted(vec![Ok("  Drink Green \n"), Ok("Sip the Planet")]);
        let reviewer = MockResponder::scripted(vec![Ok("Needs more emotion"), Ok("SHIP IT!")]);

        let session = IterationController::new()
            .run(input("  eco bottle  "), &writer, &reviewer)
            .await
            .unwrap();

        let prompts = writer.prompts();
        assert_eq!(prompts[0], "Create a slogan for: eco bottle");
        assert!(prompts[1].contains("Previous slogan: Drink Green"));
        assert!(prompts[1].contains("Feedback: Needs more emotion"));
        assert!(reviewer.prompts()[0].contains("Slogan: Drink Green"));
        assert_eq!(session.turns()[0].slogan(), "Drink Green");
    }

    // ==================== Failures ====================

    #[tokio::test]
    async fn test_writer_failure_marks_session_error() {
        let writer = MockResponder::scripted(vec![
            Ok("Drink Green"),
            Err(ResponderError::Connection("refused".to_string())),
        ]);
        let reviewer = MockResponder::always("Try again");

        let err = IterationController::new()
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap_err();

        match &err {
            RunError::Responder {
                phase,
                turn,
                session,
                ..
            } => {
                assert_eq!(*phase, AgentRole::Writer);
                assert_eq!(*turn, 2);
                assert_eq!(session.turn_count(), 1);
                assert_eq!(session.completion_reason(), Some(CompletionReason::Error));
                assert_eq!(session.final_slogan(), Some("Drink Green"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
        assert_eq!(reviewer.calls(), 1);
    }

    #[tokio::test]
    async fn test_reviewer_failure_on_first_turn() {
        let writer = MockResponder::always("Drink Green");
        let reviewer =
            MockResponder::scripted(vec![Err(ResponderError::RequestFailed("500".to_string()))]);

        let err = IterationController::new()
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResponderFailure);
        let session = err.session().unwrap();
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.completion_reason(), Some(CompletionReason::Error));
        assert_eq!(session.final_slogan(), None);
        assert!(err.to_string().contains("reviewer failed on turn 1"));
    }

    #[tokio::test]
    async fn test_empty_slogan_is_writer_failure() {
        let writer = MockResponder::always("   ");
        let reviewer = MockResponder::always("SHIP IT!");

        let err = IterationController::new()
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResponderFailure);
        assert!(matches!(
            &err,
            RunError::Responder {
                phase: AgentRole::Writer,
                turn: 1,
                source: ResponderError::InvalidResponse(_),
                ..
            }
        ));
        assert_eq!(
            err.session().unwrap().completion_reason(),
            Some(CompletionReason::Error)
        );
        assert_eq!(reviewer.calls(), 0);
    }

    #[tokio::test]
    async fn test_overlong_slogan_is_writer_failure() {
        let writer = MockResponder::always(&"s".repeat(Turn::MAX_SLOGAN_CHARS + 1));
        let reviewer = MockResponder::always("SHIP IT!");

        let err = IterationController::new()
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResponderFailure);
        assert!(matches!(
            &err,
            RunError::Responder {
                phase: AgentRole::Writer,
                ..
            }
        ));
        assert_eq!(reviewer.calls(), 0);
    }

    #[tokio::test]
    async fn test_verbose_review_is_reviewer_failure() {
        let writer = MockResponder::always("Drink Green");
        let reviewer = MockResponder::always(&"Make it punchier. ".repeat(70));

        let err = IterationController::new()
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResponderFailure);
        match &err {
            RunError::Responder {
                phase,
                turn,
                source,
                session,
            } => {
                assert_eq!(*phase, AgentRole::Reviewer);
                assert_eq!(*turn, 1);
                assert!(matches!(
                    source,
                    ResponderError::InvalidResponse(m) if m.contains("at most 1000")
                ));
                assert_eq!(session.turn_count(), 0);
                assert_eq!(session.completion_reason(), Some(CompletionReason::Error));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_feedback_at_limit_is_recorded() {
        let writer = MockResponder::always("Drink Green");
        let reviewer = MockResponder::always(&"f".repeat(Turn::MAX_FEEDBACK_CHARS));

        let session = IterationController::new()
            .run(input("bottle").with_max_turns(1), &writer, &reviewer)
            .await
            .unwrap();

        assert_eq!(session.completion_reason(), Some(CompletionReason::MaxTurns));
        assert_eq!(
            session.turns()[0].feedback().map(|f| f.chars().count()),
            Some(Turn::MAX_FEEDBACK_CHARS)
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let writer = MockResponder::always("Drink Green");
        let reviewer = MockResponder::always("SHIP IT!");

        let err = IterationController::new()
            .with_cancellation(token)
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(writer.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_slow_response() {
        let token = CancellationToken::new();
        let writer = MockResponder::always("Drink Green").with_delay(Duration::from_secs(30));
        let reviewer = MockResponder::always("SHIP IT!");

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let err = IterationController::new()
            .with_cancellation(token)
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(reviewer.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_timeout_is_distinct_from_max_turns() {
        let writer = MockResponder::always("Drink Green").with_delay(Duration::from_secs(120));
        let reviewer = MockResponder::always("Try again");

        let err = IterationController::new()
            .with_generation_timeout(Duration::from_secs(60))
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::Timeout(d) if d == Duration::from_secs(60)));
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.session().is_none());
    }

    // ==================== Observers ====================

    struct RecordingLogger(Mutex<Vec<&'static str>>);

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.0.lock().unwrap().push(event.event_type);
        }
    }

    #[tokio::test]
    async fn test_transcript_events_in_order() {
        let logger = Arc::new(RecordingLogger(Mutex::new(Vec::new())));
        let writer = MockResponder::always("Hydrate Now");
        let reviewer = MockResponder::always("SHIP IT!");

        IterationController::new()
            .with_conversation_logger(logger.clone())
            .run(input("bottle"), &writer, &reviewer)
            .await
            .unwrap();

        assert_eq!(
            *logger.0.lock().unwrap(),
            vec![
                "run_started",
                "prompt",
                "response",
                "prompt",
                "response",
                "run_completed"
            ]
        );
    }

    #[derive(Default)]
    struct RecordingProgress {
        turns: Mutex<Vec<usize>>,
        reviews: Mutex<Vec<bool>>,
        completed: Mutex<Option<CompletionReason>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_turn_start(&self, turn: usize, _max_turns: usize) {
            self.turns.lock().unwrap().push(turn);
        }
        fn on_slogan_proposed(&self, _turn: usize, _slogan: &str) {}
        fn on_review_complete(&self, _turn: usize, _feedback: &str, approved: bool) {
            self.reviews.lock().unwrap().push(approved);
        }
        fn on_run_complete(&self, reason: CompletionReason, _turn_count: usize) {
            *self.completed.lock().unwrap() = Some(reason);
        }
    }

    #[tokio::test]
    async fn test_progress_callbacks() {
        let progress = RecordingProgress::default();
        let writer = MockResponder::always("Drink Green");
        let reviewer = MockResponder::scripted(vec![Ok("Meh"), Ok("Ship it.")]);

        IterationController::new()
            .run_with_progress(input("bottle"), &writer, &reviewer, &progress)
            .await
            .unwrap();

        assert_eq!(*progress.turns.lock().unwrap(), vec![1, 2]);
        assert_eq!(*progress.reviews.lock().unwrap(), vec![false, true]);
        assert_eq!(
            *progress.completed.lock().unwrap(),
            Some(CompletionReason::Approved)
        );
    }
}
