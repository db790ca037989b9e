//! Progress reporting for planning calls

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rescue_application::{Attempt, NoPlanningProgress, PlanOutcome, PlanningProgressNotifier};
use rescue_domain::{CommandBatch, ValidationError};
use std::time::Duration;

/// Reports progress of concurrent planning calls, one spinner per snapshot
pub struct ProgressReporter {
    multi: MultiProgress,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Spinner for one snapshot, labelled with its source.
    pub fn episode(&self, label: &str) -> EpisodeProgress {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(Self::spinner_style());
        bar.set_prefix(label.to_string());
        bar.set_message("waiting");
        bar.enable_steady_tick(Duration::from_millis(100));
        EpisodeProgress { bar }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Spinner-backed notifier for a single planning call
pub struct EpisodeProgress {
    bar: ProgressBar,
}

impl PlanningProgressNotifier for EpisodeProgress {
    fn on_attempt_started(&self, attempt: Attempt) {
        let msg = match attempt {
            Attempt::Initial => "planning...".to_string(),
            Attempt::Corrective => "reprompting...".yellow().to_string(),
        };
        self.bar.set_message(msg);
    }

    fn on_validation_failed(&self, attempt: Attempt, error: &ValidationError) {
        self.bar
            .println(format!("  {} attempt {}: {}", "!".yellow(), attempt.number(), error));
    }

    fn on_fail_safe(&self, _error: &ValidationError) {
        self.bar
            .set_message("fail-safe: empty batch".red().to_string());
    }

    fn on_plan_ready(&self, batch: &CommandBatch, outcome: PlanOutcome) {
        let status = match outcome {
            PlanOutcome::FailSafe => format!("{} no commands", "x".red()),
            _ => format!("{} {} command(s) ({})", "v".green(), batch.len(), outcome),
        };
        self.bar.finish_with_message(status);
    }
}

impl Drop for EpisodeProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
///
/// Used when stderr is not a terminal, where spinners would only add noise.
pub struct SimpleProgress {
    label: String,
}

impl SimpleProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    fn attempt_line(&self, attempt: Attempt) -> String {
        format!("{} {} {} attempt", "->".cyan(), self.label.bold(), attempt)
    }

    fn rejected_line(&self, attempt: Attempt, error: &ValidationError) -> String {
        format!("  {} {}: {} attempt rejected: {}", "x".red(), self.label, attempt, error)
    }

    fn fail_safe_line(&self) -> String {
        format!("  {} {}: falling back to an empty batch", "!".red().bold(), self.label)
    }

    fn ready_line(&self, batch: &CommandBatch, outcome: PlanOutcome) -> String {
        format!("  {} {}: {} command(s), {}", "v".green(), self.label, batch.len(), outcome)
    }
}

impl PlanningProgressNotifier for SimpleProgress {
    fn on_attempt_started(&self, attempt: Attempt) {
        eprintln!("{}", self.attempt_line(attempt));
    }

    fn on_validation_failed(&self, attempt: Attempt, error: &ValidationError) {
        eprintln!("{}", self.rejected_line(attempt, error));
    }

    fn on_fail_safe(&self, _error: &ValidationError) {
        eprintln!("{}", self.fail_safe_line());
    }

    fn on_plan_ready(&self, batch: &CommandBatch, outcome: PlanOutcome) {
        eprintln!("{}", self.ready_line(batch, outcome));
    }
}

/// How planning progress is shown on the console
pub enum ConsoleProgress {
    /// One spinner per snapshot
    Spinners(ProgressReporter),
    /// Plain lines on stderr
    Lines,
    /// Nothing
    Off,
}

impl ConsoleProgress {
    /// `--quiet` wins; otherwise spinners on a terminal, lines elsewhere.
    pub fn select(quiet: bool, stderr_is_terminal: bool) -> Self {
        match (quiet, stderr_is_terminal) {
            (true, _) => ConsoleProgress::Off,
            (false, true) => ConsoleProgress::Spinners(ProgressReporter::new()),
            (false, false) => ConsoleProgress::Lines,
        }
    }

    /// Notifier for the planning call of one snapshot.
    pub fn notifier(&self, label: &str) -> Box<dyn PlanningProgressNotifier> {
        match self {
            ConsoleProgress::Spinners(reporter) => Box::new(reporter.episode(label)),
            ConsoleProgress::Lines => Box::new(SimpleProgress::new(label)),
            ConsoleProgress::Off => Box::new(NoPlanningProgress),
        }
    }
}
