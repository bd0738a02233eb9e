//! Presentation layer for slogan-gen
//!
//! This crate contains CLI definitions, output formatters,
//! result files and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, ConfigAction, FormatArg, GenerateArgs};
pub use output::console::{ConsoleFormatter, SettingRow, SourceRow};
pub use output::writer::save_session;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
