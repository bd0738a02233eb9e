//! Saving generation results to disk

use super::console::ConsoleFormatter;
use slogan_domain::{IterationSession, OutputFormat};
use std::io;
use std::path::Path;

/// Write a finished session to `path`.
///
/// A `.json` extension saves the full session record; any other extension
/// saves the plain-text summary with turn details. Parent directories are
/// created as needed. Returns the format that was written.
pub fn save_session(session: &IterationSession, path: &Path) -> io::Result<OutputFormat> {
    let format = OutputFormat::from_extension(path.extension().and_then(|e| e.to_str()));
    let content = match format {
        OutputFormat::Json => ConsoleFormatter::format_session_json(session),
        OutputFormat::Text => ConsoleFormatter::plain().format_session(session, true),
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(format)
}
