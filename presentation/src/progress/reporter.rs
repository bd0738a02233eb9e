//! Progress reporting for writer/reviewer turns

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use slogan_application::ProgressNotifier;
use slogan_domain::CompletionReason;
use slogan_domain::core::string::{single_line, truncate};
use std::sync::Mutex;
use std::time::Duration;

/// Longest slogan/feedback excerpt shown next to a spinner
const EXCERPT_CHARS: usize = 60;

/// Reports progress with one spinner per turn
pub struct ProgressReporter {
    turn_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            turn_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap()
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.turn_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.turn_bar.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_turn_start(&self, turn: usize, max_turns: usize) {
        if let Some(previous) = self.take_bar() {
            previous.finish_and_clear();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Turn {}/{}", turn, max_turns));
        pb.set_message("Writer is drafting...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.turn_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_slogan_proposed(&self, _turn: usize, slogan: &str) {
        let excerpt = truncate(&single_line(slogan), EXCERPT_CHARS);
        self.with_bar(|pb| pb.set_message(format!("Reviewer is reading \"{}\"", excerpt)));
    }

    fn on_review_complete(&self, turn: usize, feedback: &str, approved: bool) {
        let Some(pb) = self.take_bar() else {
            return;
        };
        if approved {
            pb.finish_with_message(format!("{} approved", "v".green()));
        } else {
            let excerpt = truncate(&single_line(feedback), EXCERPT_CHARS);
            pb.finish_with_message(format!("{} {}", "x".yellow(), excerpt.dimmed()));
        }
        tracing::debug!(turn, approved, "Turn finished");
    }

    fn on_run_complete(&self, reason: CompletionReason, _turn_count: usize) {
        if let Some(pb) = self.take_bar() {
            match reason {
                CompletionReason::Error => pb.abandon_with_message("failed".red().to_string()),
                _ => pb.finish_and_clear(),
            }
        }
    }
}

/// Plain line-per-event progress on stderr (no spinners)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_run_start(&self, topic: &str, max_turns: usize) {
        eprintln!(
            "{} Generating a slogan for {} (up to {} turns)",
            "->".cyan(),
            topic.bold(),
            max_turns
        );
    }

    fn on_turn_start(&self, turn: usize, max_turns: usize) {
        eprintln!("  Turn {}/{}", turn, max_turns);
    }

    fn on_slogan_proposed(&self, _turn: usize, slogan: &str) {
        eprintln!("    writer:   {}", single_line(slogan));
    }

    fn on_review_complete(&self, _turn: usize, feedback: &str, approved: bool) {
        let mark = if approved { "v".green() } else { "x".red() };
        eprintln!(
            "    reviewer: {} {}",
            mark,
            truncate(&single_line(feedback), EXCERPT_CHARS)
        );
    }

    fn on_run_complete(&self, reason: CompletionReason, turn_count: usize) {
        eprintln!(
            "{} {} after {} turn(s)",
            "->".cyan(),
            reason.display_name(),
            turn_count
        );
    }
}
