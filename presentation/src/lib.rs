//! Presentation layer for rescue-planner
//!
//! This crate contains the CLI definition, output formatters and
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::{console::ConsoleFormatter, formatter::OutputFormatter, json::JsonFormatter};
pub use progress::reporter::{ConsoleProgress, EpisodeProgress, ProgressReporter, SimpleProgress};
