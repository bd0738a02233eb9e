//! Console output formatter for generation results

use colored::{ColoredString, Colorize};
use slogan_application::{GenerationReport, ModelEntry};
use slogan_domain::{CompletionReason, IterationSession};

/// One line of `config show`: label, value, allowed range
pub struct SettingRow {
    pub label: &'static str,
    pub value: String,
    pub range: Option<&'static str>,
}

/// One configuration layer for `config show`
pub struct SourceRow {
    pub label: &'static str,
    pub location: String,
    pub found: bool,
}

/// Formats sessions, model lists and settings for the terminal
///
/// With `color` off every method returns plain text, which is what gets
/// written to result files.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleFormatter {
    color: bool,
}

impl ConsoleFormatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    // ==================== Sessions ====================

    /// Human-readable summary of a finished session
    pub fn format_session(&self, session: &IterationSession, verbose: bool) -> String {
        let Some(reason) = session.completion_reason() else {
            return self.paint("Session not completed", |s| s.yellow());
        };

        let mut output = String::new();
        output.push_str(&self.header("SLOGAN GENERATION RESULTS"));
        output.push('\n');

        if let Some(slogan) = session.final_slogan() {
            output.push_str(&format!(
                "\n{} {}\n",
                self.paint("Final Slogan:", |s| s.cyan().bold()),
                self.paint(slogan, |s| s.bold())
            ));
        }

        output.push_str(&format!(
            "\n{} {}\n",
            self.paint("Status:", |s| s.cyan().bold()),
            self.reason_label(reason)
        ));

        output.push_str(&format!("\n{}\n", self.paint("Statistics:", |s| s.cyan().bold())));
        output.push_str(&format!("  * Total iterations: {}\n", session.turn_count()));
        output.push_str(&format!("  * Model: {}\n", session.model_name()));
        output.push_str(&format!("  * Input: {}\n", session.user_input()));
        if let Some(duration) = session.duration() {
            output.push_str(&format!(
                "  * Duration: {:.2}s\n",
                duration.num_milliseconds() as f64 / 1000.0
            ));
        }

        if verbose && !session.turns().is_empty() {
            output.push_str(&self.section_header("Iteration Details"));
            for turn in session.turns() {
                output.push_str(&format!(
                    "\n{}\n",
                    self.paint(&format!("── Turn {} ──", turn.turn_number()), |s| {
                        s.yellow().bold()
                    })
                ));
                output.push_str(&format!("  Slogan:   {}\n", turn.slogan()));
                if let Some(feedback) = turn.feedback() {
                    output.push_str(&format!(
                        "  Feedback: {}\n",
                        Self::indent_continuation(feedback, "            ")
                    ));
                }
                let approved = if turn.approved() {
                    self.paint("yes", |s| s.green())
                } else {
                    self.paint("no", |s| s.red())
                };
                output.push_str(&format!("  Approved: {}\n", approved));
            }
        }

        output.push_str(&self.footer());
        output
    }

    fn reason_label(&self, reason: CompletionReason) -> String {
        let label = reason.display_name();
        match reason {
            CompletionReason::Approved => self.paint(label, |s| s.green().bold()),
            CompletionReason::MaxTurns => self.paint(label, |s| s.yellow().bold()),
            CompletionReason::Error => self.paint(label, |s| s.red().bold()),
        }
    }

    /// The full session as pretty JSON (flat record shape)
    pub fn format_session_json(session: &IterationSession) -> String {
        serde_json::to_string_pretty(session).unwrap_or_else(|_| "{}".to_string())
    }

    /// The generation report as pretty JSON
    pub fn format_report_json(report: &GenerationReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    // ==================== Models ====================

    pub fn format_models(&self, models: &[ModelEntry]) -> String {
        if models.is_empty() {
            return format!(
                "{}\n\nTo install a model, run: ollama pull <model-name>\n",
                self.paint("No models found.", |s| s.yellow())
            );
        }

        let mut output = format!(
            "{}\n\n",
            self.paint("Available models:", |s| s.cyan().bold())
        );
        for (i, model) in models.iter().enumerate() {
            if model.is_default {
                output.push_str(&format!(
                    "  {}. {} {} (default)\n",
                    i + 1,
                    self.paint(&model.name, |s| s.green().bold()),
                    self.paint(&format!("[{}]", model.display_name), |s| s.dimmed())
                ));
            } else {
                output.push_str(&format!(
                    "  {}. {} {}\n",
                    i + 1,
                    model.name,
                    self.paint(&format!("[{}]", model.display_name), |s| s.dimmed())
                ));
            }
        }
        output.push_str(&format!("\nTotal: {} models\n", models.len()));
        output
    }

    // ==================== Configuration ====================

    pub fn format_settings(&self, rows: &[SettingRow], sources: &[SourceRow]) -> String {
        let mut output = self.header("Current Configuration");
        output.push('\n');

        for row in rows {
            let value = match row.range {
                Some(range) => format!("{} (range: {})", row.value, range),
                None => row.value.clone(),
            };
            output.push_str(&format!(
                "{:.<25} {}\n",
                row.label,
                self.paint(&value, |s| s.green())
            ));
        }

        output.push_str(&self.section_header("Sources (highest priority first)"));
        for source in sources {
            let marker = if source.found { "[FOUND]" } else { "[     ]" };
            output.push_str(&format!(
                "  {} {:<12} {}\n",
                self.paint(marker, |s| s.dimmed()),
                format!("{}:", source.label),
                source.location
            ));
        }

        output.push_str(&self.footer());
        output
    }

    // ==================== Pieces ====================

    fn header(&self, title: &str) -> String {
        let line = "=".repeat(60);
        format!(
            "{}\n{}\n{}",
            self.paint(&line, |s| s.cyan()),
            self.paint(&format!("{:^60}", title), |s| s.bold()),
            self.paint(&line, |s| s.cyan())
        )
    }

    fn section_header(&self, title: &str) -> String {
        format!(
            "\n{}\n{}\n",
            self.paint(title, |s| s.cyan().bold()),
            "-".repeat(40)
        )
    }

    fn footer(&self) -> String {
        format!("\n{}\n", self.paint(&"=".repeat(60), |s| s.cyan()))
    }

    /// Indent every line after the first
    fn indent_continuation(text: &str, prefix: &str) -> String {
        text.lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    line.to_string()
                } else {
                    format!("{}{}", prefix, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
