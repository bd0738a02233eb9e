//! Generate Slogan use case
//!
//! The service boundary: takes a request, resolves the run-scoped
//! configuration, prepares one writer and one reviewer, runs the
//! [`IterationController`] under the generation timeout and turns the
//! finished session into a [`GenerationReport`].

use crate::config::{GenerationConfig, RunOverrides};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::responder::{ChatGateway, ResponderError};
use crate::use_cases::iteration::{ErrorKind, IterationController, IterationInput, RunError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use slogan_domain::{AgentRole, CompletionReason, IterationSession, Model, Topic};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while serving a generation request
#[derive(Error, Debug)]
pub enum GenerateSloganError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model '{model}' not found. Available models: {}", .available.join(", "))]
    ModelNotFound {
        model: String,
        available: Vec<String>,
    },

    #[error("Could not prepare the {role}: {source}")]
    Setup {
        role: AgentRole,
        #[source]
        source: ResponderError,
    },

    #[error(transparent)]
    Run(#[from] RunError),
}

impl GenerateSloganError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateSloganError::InvalidInput(_) | GenerateSloganError::ModelNotFound { .. } => {
                ErrorKind::InvalidInput
            }
            GenerateSloganError::Setup { source, .. } if source.is_backend_unavailable() => {
                ErrorKind::BackendUnavailable
            }
            GenerateSloganError::Setup { .. } => ErrorKind::ResponderFailure,
            GenerateSloganError::Run(e) => e.kind(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
}

/// Input for the GenerateSlogan use case
#[derive(Debug, Clone, Default)]
pub struct GenerateSloganInput {
    /// Product or service description
    pub topic: String,
    /// Model override for this request only
    pub model: Option<String>,
    /// Turn cap override for this request only
    pub max_turns: Option<usize>,
    /// Include per-turn details in the report
    pub verbose: bool,
}

impl GenerateSloganInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// One turn as shown in a verbose report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnDetail {
    pub turn_number: usize,
    pub slogan: String,
    pub feedback: Option<String>,
    pub approved: bool,
    pub timestamp: DateTime<Utc>,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Final slogan, empty when the run produced none
    pub slogan: String,
    pub input: String,
    pub completion_reason: CompletionReason,
    pub turn_count: usize,
    pub model_name: String,
    pub total_duration_seconds: f64,
    pub average_duration_per_turn: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turns: Option<Vec<TurnDetail>>,
    pub created_at: DateTime<Utc>,
}

impl GenerationReport {
    /// Summarize a completed session. Durations are rounded to 10ms.
    pub fn from_session(session: &IterationSession, verbose: bool) -> Self {
        let end = session.completed_at().unwrap_or_else(Utc::now);
        let total = (end - session.started_at()).num_milliseconds().max(0) as f64 / 1000.0;
        let average = if session.turn_count() == 0 {
            0.0
        } else {
            total / session.turn_count() as f64
        };

        let turns = (verbose && session.turn_count() > 0).then(|| {
            session
                .turns()
                .iter()
                .map(|t| TurnDetail {
                    turn_number: t.turn_number(),
                    slogan: t.slogan().to_string(),
                    feedback: t.feedback().map(str::to_string),
                    approved: t.approved(),
                    timestamp: t.timestamp(),
                })
                .collect()
        });

        Self {
            slogan: session.final_slogan().unwrap_or_default().to_string(),
            input: session.user_input().content().to_string(),
            completion_reason: session
                .completion_reason()
                .unwrap_or(CompletionReason::Error),
            turn_count: session.turn_count(),
            model_name: session.model_name().to_string(),
            total_duration_seconds: round2(total),
            average_duration_per_turn: round2(average),
            turns,
            created_at: session.started_at(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Output of the GenerateSlogan use case
#[derive(Debug, Clone)]
pub struct GenerateSloganOutput {
    pub report: GenerationReport,
    pub session: IterationSession,
}

/// Use case for generating one slogan
pub struct GenerateSloganUseCase<G: ChatGateway + 'static> {
    gateway: Arc<G>,
    config: GenerationConfig,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation: Option<CancellationToken>,
}

impl<G: ChatGateway + 'static> GenerateSloganUseCase<G> {
    pub fn new(gateway: Arc<G>, config: GenerationConfig) -> Self {
        Self {
            gateway,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation: None,
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: GenerateSloganInput,
    ) -> Result<GenerateSloganOutput, GenerateSloganError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: GenerateSloganInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<GenerateSloganOutput, GenerateSloganError> {
        // Reject unusable requests before touching the backend
        Topic::new(input.topic.as_str())
            .map_err(|e| GenerateSloganError::InvalidInput(e.to_string()))?;
        if let Some(max_turns) = input.max_turns
            && !(1..=IterationSession::MAX_TURNS).contains(&max_turns)
        {
            return Err(GenerateSloganError::InvalidInput(format!(
                "max_turns must be between 1 and {}, got {}",
                IterationSession::MAX_TURNS,
                max_turns
            )));
        }

        let model_override = input
            .model
            .as_deref()
            .map(Model::new)
            .transpose()
            .map_err(|e| GenerateSloganError::InvalidInput(e.to_string()))?;

        if let Some(model) = &model_override {
            self.check_model(model).await?;
        }

        let overrides = RunOverrides {
            model: model_override,
            max_turns: input.max_turns,
        };
        let run_config = self.config.resolve(&overrides);
        debug!(?run_config, "Resolved run configuration");

        let writer = self
            .gateway
            .create_responder(&run_config.model, AgentRole::Writer)
            .await
            .map_err(|source| GenerateSloganError::Setup {
                role: AgentRole::Writer,
                source,
            })?;
        let reviewer = self
            .gateway
            .create_responder(&run_config.model, AgentRole::Reviewer)
            .await
            .map_err(|source| GenerateSloganError::Setup {
                role: AgentRole::Reviewer,
                source,
            })?;

        let mut controller = IterationController::new()
            .with_default_max_turns(run_config.max_turns)
            .with_generation_timeout(run_config.generation_timeout)
            .with_conversation_logger(Arc::clone(&self.conversation_logger));
        if let Some(token) = &self.cancellation {
            controller = controller.with_cancellation(token.clone());
        }

        let iteration_input = IterationInput {
            user_input: input.topic,
            model_name: run_config.model.to_string(),
            max_turns: Some(run_config.max_turns),
        };
        let session = controller
            .run_with_progress(iteration_input, writer.as_ref(), reviewer.as_ref(), progress)
            .await?;

        let report = GenerationReport::from_session(&session, input.verbose);
        info!(
            reason = report.completion_reason.as_str(),
            turns = report.turn_count,
            seconds = report.total_duration_seconds,
            "Generation request served"
        );
        Ok(GenerateSloganOutput { report, session })
    }

    /// Reject a model the backend says it does not have.
    ///
    /// If the backend cannot list its models the run goes ahead and any
    /// problem surfaces from the first responder call instead.
    async fn check_model(&self, model: &Model) -> Result<(), GenerateSloganError> {
        match self.gateway.available_models().await {
            Ok(available) if available.contains(model) => Ok(()),
            Ok(available) => Err(GenerateSloganError::ModelNotFound {
                model: model.to_string(),
                available: available.iter().map(|m| m.to_string()).collect(),
            }),
            Err(e) => {
                warn!(error = %e, "Could not list models; skipping model check");
                Ok(())
            }
        }
    }
}
