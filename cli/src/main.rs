//! CLI entrypoint for slogan-gen
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use slogan_application::{
    ErrorKind, GenerateSloganError, GenerateSloganInput, GenerateSloganUseCase, ListModelsUseCase,
    NoProgress, ProgressNotifier, ResponderError,
};
use slogan_domain::OutputFormat;
use slogan_infrastructure::{
    ConfigError, ConfigLoader, ConfigValidationError, FileConfig, JsonlConversationLogger,
    OllamaGateway, OllamaSettings,
};
use slogan_presentation::{
    Cli, Command, ConfigAction, ConsoleFormatter, GenerateArgs, ProgressReporter, SettingRow,
    SimpleProgress, SourceRow, save_session,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Exit status for a run cancelled with Ctrl-C
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code(&e);
            if code == EXIT_CANCELLED {
                eprintln!("{}", "Cancelled.".yellow());
            } else {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            }
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    };

    let log_file = config
        .as_ref()
        .ok()
        .and_then(|c| c.logging.file.as_deref())
        .map(PathBuf::from);
    let _log_guard = init_logging(cli.verbose, log_file.as_deref())?;
    let config = config?;

    if !config.output.color {
        colored::control::set_override(false);
    }
    let formatter = ConsoleFormatter::new(config.output.color && !cli.no_color);

    info!("Starting slogan-gen");

    match &cli.command {
        Command::Generate(args) => generate(&cli, args, &config, formatter).await,
        Command::Models => list_models(&config, formatter).await,
        Command::Config {
            action: ConfigAction::Show,
        } => {
            print!("{}", show_config(&cli, &config, formatter));
            Ok(())
        }
    }
}

// ==================== Commands ====================

async fn generate(
    cli: &Cli,
    args: &GenerateArgs,
    config: &FileConfig,
    formatter: ConsoleFormatter,
) -> Result<()> {
    // === Dependency Injection ===
    let gateway = Arc::new(OllamaGateway::new(OllamaSettings::from(&config.ollama))?);
    let generation_config = config.generation_config()?;

    let cancellation = CancellationToken::new();
    spawn_ctrl_c_handler(cancellation.clone());

    let mut use_case =
        GenerateSloganUseCase::new(gateway, generation_config).with_cancellation(cancellation);

    let transcript = args
        .transcript
        .clone()
        .or_else(|| config.logging.conversation_log.as_ref().map(PathBuf::from));
    if let Some(path) = transcript {
        let logger = JsonlConversationLogger::open(&path)
            .with_context(|| format!("Could not open transcript {}", path.display()))?;
        info!(path = %path.display(), "Writing conversation transcript");
        use_case = use_case.with_conversation_logger(Arc::new(logger));
    }

    let verbose_turns = args.verbose_turns || config.output.verbose_turns;
    let mut input = GenerateSloganInput::new(args.input.as_str()).verbose(verbose_turns);
    if let Some(model) = &args.model {
        input = input.with_model(model.as_str());
    }
    if let Some(max_turns) = args.max_turns {
        input = input.with_max_turns(usize::from(max_turns));
    }

    let progress: Box<dyn ProgressNotifier> = if cli.quiet || !config.output.show_progress {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let output = match use_case
        .execute_with_progress(input, progress.as_ref())
        .await
    {
        Ok(output) => output,
        Err(e) => {
            report_partial_session(&e, formatter);
            return Err(e.into());
        }
    };

    let format = args
        .format
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    match format {
        OutputFormat::Text => print!("{}", formatter.format_session(&output.session, verbose_turns)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_report_json(&output.report)),
    }

    if let Some(path) = &args.output {
        let written = save_session(&output.session, path)
            .with_context(|| format!("Could not save result to {}", path.display()))?;
        eprintln!(
            "{} Saved {} result to {}",
            "v".green(),
            match written {
                OutputFormat::Json => "JSON",
                OutputFormat::Text => "text",
            },
            path.display()
        );
    }

    Ok(())
}

/// Show the turns that were recorded before a run failed
fn report_partial_session(error: &GenerateSloganError, formatter: ConsoleFormatter) {
    if let GenerateSloganError::Run(run_error) = error
        && let Some(session) = run_error.session()
        && session.turn_count() > 0
    {
        warn!(turns = session.turn_count(), "Run failed after partial progress");
        eprint!("{}", formatter.format_session(session, true));
    }
}

async fn list_models(config: &FileConfig, formatter: ConsoleFormatter) -> Result<()> {
    let gateway = Arc::new(OllamaGateway::new(OllamaSettings::from(&config.ollama))?);
    let generation_config = config.generation_config()?;

    let models = ListModelsUseCase::new(gateway, generation_config.model().clone())
        .execute()
        .await
        .with_context(|| format!("Could not list models from {}", config.ollama.base_url))?;

    print!("{}", formatter.format_models(&models));
    Ok(())
}

fn show_config(cli: &Cli, config: &FileConfig, formatter: ConsoleFormatter) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "(none)".to_string());

    let rows = vec![
        SettingRow {
            label: "Base URL",
            value: config.ollama.base_url.clone(),
            range: None,
        },
        SettingRow {
            label: "Default Model",
            value: config.ollama.model_name.clone(),
            range: None,
        },
        SettingRow {
            label: "Temperature",
            value: config.ollama.temperature.to_string(),
            range: Some("0.0-2.0"),
        },
        SettingRow {
            label: "Max Tokens",
            value: config.ollama.max_tokens.to_string(),
            range: Some("1-4096"),
        },
        SettingRow {
            label: "Request Timeout (s)",
            value: config.ollama.timeout.to_string(),
            range: Some("1-300"),
        },
        SettingRow {
            label: "Max Turns",
            value: config.ollama.max_turns.to_string(),
            range: Some("1-10"),
        },
        SettingRow {
            label: "Generation Timeout (s)",
            value: config.generation.timeout.to_string(),
            range: Some("60-1800"),
        },
        SettingRow {
            label: "Output Format",
            value: match config.output.format.unwrap_or_default() {
                OutputFormat::Text => "text".to_string(),
                OutputFormat::Json => "json".to_string(),
            },
            range: None,
        },
        SettingRow {
            label: "Log File",
            value: optional(&config.logging.file),
            range: None,
        },
        SettingRow {
            label: "Transcript",
            value: optional(&config.logging.conversation_log),
            range: None,
        },
    ];

    let sources: Vec<SourceRow> = ConfigLoader::config_sources(cli.config.as_deref(), cli.no_config)
        .into_iter()
        .map(|s| SourceRow {
            label: s.label,
            location: s.location,
            found: s.found,
        })
        .collect();

    formatter.format_settings(&rows, &sources)
}

// ==================== Runtime plumbing ====================

fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling");
            token.cancel();
        }
    });
}

/// Console logs go to stderr; `[logging] file` adds a plain-text file sink.
///
/// Without `-v`, `RUST_LOG` is honoured and defaults to `warn`.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Process exit status for a failed command
///
/// 2 = invalid input or configuration, 3 = backend unavailable,
/// 4 = timeout, 130 = cancelled, 1 = anything else.
fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(e) = error.downcast_ref::<GenerateSloganError>() {
        return kind_exit_code(e.kind());
    }
    if let Some(e) = error.downcast_ref::<ResponderError>() {
        return match e {
            ResponderError::Timeout => 4,
            e if e.is_backend_unavailable() => 3,
            _ => 1,
        };
    }
    if error.downcast_ref::<ConfigError>().is_some()
        || error.downcast_ref::<ConfigValidationError>().is_some()
    {
        return 2;
    }
    1
}

fn kind_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InvalidInput => 2,
        ErrorKind::BackendUnavailable => 3,
        ErrorKind::Timeout => 4,
        ErrorKind::Cancelled => EXIT_CANCELLED,
        ErrorKind::ResponderFailure | ErrorKind::ValidationFailure => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slogan_application::RunError;
    use std::time::Duration;

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let invalid = anyhow::Error::from(GenerateSloganError::InvalidInput("blank".into()));
        assert_eq!(exit_code(&invalid), 2);

        let timeout =
            anyhow::Error::from(GenerateSloganError::Run(RunError::Timeout(Duration::from_secs(600))));
        assert_eq!(exit_code(&timeout), 4);

        let cancelled = anyhow::Error::from(GenerateSloganError::Run(RunError::Cancelled));
        assert_eq!(exit_code(&cancelled), EXIT_CANCELLED);
    }

    #[test]
    fn test_exit_codes_see_through_context() {
        let err = anyhow::Error::from(ResponderError::Connection("refused".into()))
            .context("Could not list models");
        assert_eq!(exit_code(&err), 3);

        let config = anyhow::Error::from(ConfigError::NotFound(PathBuf::from("missing.toml")));
        assert_eq!(exit_code(&config), 2);

        assert_eq!(exit_code(&anyhow!("something else")), 1);
    }
}
