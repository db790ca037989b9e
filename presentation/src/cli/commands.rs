//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for planned batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable summary per snapshot
    Pretty,
    /// One JSON object per snapshot, one per line
    Json,
}

/// CLI arguments for rescue-planner
#[derive(Parser, Debug)]
#[command(name = "rescue-planner")]
#[command(author, version, about = "Plan one tick of agent commands for a disaster-response simulation")]
#[command(long_about = r#"
rescue-planner turns world snapshots into validated command batches.

For each snapshot the selected strategy builds a prompt, the provider
answers, and the reply is checked against the command schema. An invalid
reply gets one corrective reprompt; if that also fails the batch is empty.

Configuration is loaded from (in priority order):
1. RESCUE_<SECTION>__<KEY>                    Environment
2. --config <path>                            Explicit config file
3. ./rescue-planner.toml                      Project-level config
4. ~/.config/rescue-planner/config.toml       Global config

Example:
  rescue-planner snapshot.json
  rescue-planner --provider groq --strategy reflexive --scratchpad pad.json tick_12.json
  cat snapshot.json | rescue-planner --output json -
  rescue-planner --log-dir logs --run-id baseline ep1.json ep2.json ep3.json
"#)]
pub struct Cli {
    /// World snapshot JSON files to plan for (`-` reads stdin)
    #[arg(value_name = "SNAPSHOT")]
    pub snapshots: Vec<PathBuf>,

    /// Prompting strategy (reactive, chain_of_thought, reflexive, plan_then_act, tree_of_thought)
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<String>,

    /// Backend (reference, groq, gemini, ollama)
    #[arg(short, long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model name (defaults to the provider's default model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long, value_name = "TEMP")]
    pub temperature: Option<f32>,

    /// Total provider attempts per call
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Base of the exponential backoff between attempts, in seconds
    #[arg(long, value_name = "SECS")]
    pub backoff: Option<f64>,

    /// Command cap of the reference policy
    #[arg(long, value_name = "N")]
    pub max_commands: Option<usize>,

    /// Scratchpad JSON file for the reflexive strategy
    #[arg(long, value_name = "PATH")]
    pub scratchpad: Option<PathBuf>,

    /// Tick number recorded in the conversation log
    #[arg(long, value_name = "N")]
    pub tick: Option<u64>,

    /// Run identifier for the conversation log file name
    #[arg(long, value_name = "ID")]
    pub run_id: Option<String>,

    /// Directory for JSONL conversation logs
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,

    /// Also print the raw provider reply
    #[arg(long)]
    pub raw: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
