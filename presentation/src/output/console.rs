//! Console output formatter for planned batches

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use rescue_application::{PlanOutcome, PlanOutput};
use rescue_domain::{Command, Directive};

/// Formats planning results for console display
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter {
    show_raw: bool,
}

impl ConsoleFormatter {
    pub fn new(show_raw: bool) -> Self {
        Self { show_raw }
    }

    fn header(source: &str) -> String {
        format!("{} {}\n", "==".cyan().bold(), source.bold())
    }

    fn outcome(outcome: PlanOutcome) -> String {
        match outcome {
            PlanOutcome::Accepted => "accepted".green().to_string(),
            PlanOutcome::Corrected => "corrected after reprompt".yellow().to_string(),
            PlanOutcome::FailSafe => "fail-safe (no commands)".red().bold().to_string(),
        }
    }

    fn command_line(command: &Command) -> String {
        match &command.directive {
            Directive::Move { to } => format!(
                "  {} {} {}",
                command.agent_id.bold(),
                "move".cyan(),
                to
            ),
            Directive::Act { action_name } => format!(
                "  {} {} {}",
                command.agent_id.bold(),
                "act".magenta(),
                action_name
            ),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_plan(&self, source: &str, output: &PlanOutput) -> String {
        let mut out = Self::header(source);

        out.push_str(&format!(
            "{} {}\n",
            "Outcome:".cyan().bold(),
            Self::outcome(output.outcome)
        ));

        if output.batch.is_empty() {
            out.push_str(&format!("  {}\n", "(no commands)".dimmed()));
        } else {
            for command in output.batch.iter() {
                out.push_str(&Self::command_line(command));
                out.push('\n');
            }
        }

        if !output.issues.is_empty() {
            out.push_str(&format!("{}\n", "Issues:".yellow().bold()));
            for issue in &output.issues {
                out.push_str(&format!("  * {}\n", issue));
            }
        }

        if self.show_raw {
            out.push_str(&format!(
                "{}\n{}\n",
                "Raw response:".cyan().bold(),
                output.raw_response
            ));
        }

        out
    }

    fn format_failure(&self, source: &str, error: &str) -> String {
        format!(
            "{}{} {}\n",
            Self::header(source),
            "Error:".red().bold(),
            error
        )
    }
}
