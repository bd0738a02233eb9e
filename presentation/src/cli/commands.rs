//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use slogan_domain::OutputFormat;
use std::path::PathBuf;

/// Console output format for a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Human-readable summary
    Text,
    /// Generation report as JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for slogan-gen
#[derive(Parser, Debug)]
#[command(name = "slogan-gen")]
#[command(author, version, about = "Slogan generation through writer/reviewer collaboration")]
#[command(long_about = r#"
slogan-gen asks a writer model for a slogan, has a reviewer model critique it,
and repeats until the reviewer answers "SHIP IT!" or the turn limit is reached.

Configuration is merged from (highest priority first):
1. OLLAMA_* and SLOGAN_GENERATION_TIMEOUT environment variables
2. --config <path>         Explicit config file
3. ./slogan-gen.toml       Project-level config
4. ~/.config/slogan-gen/config.toml   Global config

Example:
  slogan-gen generate "eco-friendly water bottle"
  slogan-gen generate "AI coding assistant" --model mistral:latest
  slogan-gen generate "cloud platform" --max-turns 10 -t -o result.json
  slogan-gen models
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a slogan for a product or service description
    Generate(GenerateArgs),

    /// List the models available on the chat backend
    Models,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Product or service description (e.g. "eco-friendly water bottle")
    pub input: String,

    /// Model to use for both writer and reviewer
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum writer/reviewer turns (1-10)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=10))]
    pub max_turns: Option<u8>,

    /// Show every turn, not just the result
    #[arg(short = 't', long)]
    pub verbose_turns: bool,

    /// Save the result to a file (.json saves the full session)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Console output format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Append a JSONL transcript of prompts and replies to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective configuration and where it came from
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "slogan-gen",
            "-vv",
            "generate",
            "eco-friendly water bottle",
            "--model",
            "mistral:latest",
            "--max-turns",
            "3",
            "-t",
            "-o",
            "out.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.input, "eco-friendly water bottle");
                assert_eq!(args.model.as_deref(), Some("mistral:latest"));
                assert_eq!(args.max_turns, Some(3));
                assert!(args.verbose_turns);
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
                assert_eq!(args.format, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_max_turns_range_enforced() {
        for bad in ["0", "11"] {
            let result =
                Cli::try_parse_from(["slogan-gen", "generate", "bottle", "--max-turns", bad]);
            assert!(result.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["slogan-gen", "models", "--no-color", "-q"]).unwrap();
        assert!(matches!(cli.command, Command::Models));
        assert!(cli.no_color);
        assert!(cli.quiet);
    }

    #[test]
    fn test_config_show() {
        let cli = Cli::try_parse_from(["slogan-gen", "config", "show", "--no-config"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));
        assert!(cli.no_config);
    }

    #[test]
    fn test_format_arg_maps_to_domain() {
        let cli =
            Cli::try_parse_from(["slogan-gen", "generate", "bottle", "--format", "json"]).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.format.map(OutputFormat::from), Some(OutputFormat::Json));
    }
}
