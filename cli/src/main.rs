//! CLI entrypoint for rescue-planner
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use rescue_application::{
    ConversationLogger, NoConversationLogger, PlanOutput, PlanTickError, PlanTickInput,
    PlanTickUseCase, ProviderGateway,
};
use rescue_domain::{ConfigIssue, Scratchpad, Severity, WorldSnapshot};
use rescue_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, create_provider};
use rescue_presentation::{
    Cli, ConsoleFormatter, ConsoleProgress, JsonFormatter, OutputFormat, OutputFormatter,
};
use serde_json::Value;
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// A snapshot read from disk (or stdin), ready to plan.
struct Episode {
    source: String,
    input: PlanTickInput,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    if cli.snapshots.is_empty() {
        bail!("No snapshot given. Pass one or more SNAPSHOT files, or - for stdin.");
    }

    info!("Starting rescue-planner");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("{}", e))
            .context("Failed to load configuration")?
    };
    apply_cli_overrides(&cli, &mut config);

    let issues = config.validate();
    report_issues(&issues);
    if ConfigIssue::has_errors(&issues) {
        bail!("Invalid configuration");
    }

    let (provider_kind, _) = config.planning.parse_provider();
    let (params, _) = config.planning.to_planning_params();
    let strategy = params.strategy;

    // === Inputs ===
    let scratchpad = cli
        .scratchpad
        .as_deref()
        .map(read_scratchpad)
        .transpose()?;
    let episodes = cli
        .snapshots
        .iter()
        .map(|path| read_episode(path, scratchpad.as_ref(), cli.tick))
        .collect::<Result<Vec<_>>>()?;

    // === Dependency Injection ===
    let provider = create_provider(
        provider_kind,
        &config.providers,
        config.planning.max_commands,
    )
    .with_context(|| format!("Provider '{}' is not usable", provider_kind))?;
    let gateway = Arc::new(ProviderGateway::new(provider));

    let conversation_logger: Arc<dyn ConversationLogger> =
        match config.logging.conversation_dir.as_deref() {
            Some(dir) => {
                let run_id = cli
                    .run_id
                    .clone()
                    .unwrap_or_else(|| chrono::Local::now().format("%Y%m%d-%H%M%S").to_string());
                match JsonlConversationLogger::for_run(dir, strategy, &run_id) {
                    Some(logger) => {
                        info!("Conversation log: {}", logger.path().display());
                        Arc::new(logger)
                    }
                    None => {
                        warn!("Conversation logging disabled");
                        Arc::new(NoConversationLogger)
                    }
                }
            }
            None => Arc::new(NoConversationLogger),
        };

    let use_case =
        PlanTickUseCase::new(gateway, params).with_conversation_logger(conversation_logger);

    info!(
        "Planning {} snapshot(s) with {} via {}",
        episodes.len(),
        strategy,
        provider_kind
    );

    // The blocking HTTP client must not be dropped inside the runtime;
    // `use_case` outlives it.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let progress = ConsoleProgress::select(cli.quiet, std::io::stderr().is_terminal());
    let results = runtime.block_on(plan_all(&use_case, episodes, &progress))?;

    // === Output ===
    let formatter: Box<dyn OutputFormatter> = match cli.output {
        OutputFormat::Pretty => Box::new(ConsoleFormatter::new(cli.raw)),
        OutputFormat::Json => Box::new(JsonFormatter::new(cli.raw)),
    };

    let total = results.len();
    let mut failed = 0;
    for (source, result) in &results {
        let text = match result {
            Ok(output) => formatter.format_plan(source, output),
            Err(e) => {
                failed += 1;
                formatter.format_failure(source, &e.to_string())
            }
        };
        println!("{}", text.trim_end());
    }

    if failed > 0 {
        bail!("{} of {} snapshot(s) could not be planned", failed, total);
    }

    Ok(())
}

/// Plan every episode concurrently, one blocking task each.
///
/// Results come back in input order.
async fn plan_all(
    use_case: &PlanTickUseCase,
    episodes: Vec<Episode>,
    progress: &ConsoleProgress,
) -> Result<Vec<(String, Result<PlanOutput, PlanTickError>)>> {
    let mut handles = Vec::with_capacity(episodes.len());

    for Episode { source, input } in episodes {
        let use_case = use_case.clone();
        let notifier = progress.notifier(&source);
        let handle = tokio::task::spawn_blocking(move || {
            let result = use_case.execute(input, notifier.as_ref());
            (source, result)
        });
        handles.push(handle);
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.context("Planning task panicked")?);
    }
    Ok(results)
}

/// CLI flags take precedence over every config source.
fn apply_cli_overrides(cli: &Cli, config: &mut FileConfig) {
    let planning = &mut config.planning;
    if let Some(provider) = &cli.provider {
        planning.provider = provider.clone();
    }
    if let Some(strategy) = &cli.strategy {
        planning.strategy = strategy.clone();
    }
    if let Some(model) = &cli.model {
        planning.model = Some(model.clone());
    }
    if let Some(temperature) = cli.temperature {
        planning.temperature = temperature;
    }
    if let Some(max_attempts) = cli.max_attempts {
        planning.max_attempts = max_attempts;
    }
    if let Some(backoff) = cli.backoff {
        planning.backoff_base_secs = backoff;
    }
    if let Some(max_commands) = cli.max_commands {
        planning.max_commands = max_commands;
    }
    if let Some(dir) = &cli.log_dir {
        config.logging.conversation_dir = Some(dir.clone());
    }
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue.message),
            Severity::Warning => warn!("{}", issue.message),
        }
    }
}

fn read_source(path: &Path) -> Result<(String, String)> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read snapshot from stdin")?;
        return Ok(("<stdin>".to_string(), text));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok((path.display().to_string(), text))
}

fn read_episode(
    path: &Path,
    scratchpad: Option<&Scratchpad>,
    tick: Option<u64>,
) -> Result<Episode> {
    let (source, text) = read_source(path)?;
    let snapshot = WorldSnapshot::from_json_str(&text)
        .with_context(|| format!("{} is not a JSON snapshot", source))?;

    let mut input = PlanTickInput::new(snapshot);
    if let Some(pad) = scratchpad {
        input = input.with_scratchpad(pad.clone());
    }
    if let Some(tick) = tick {
        input = input.with_tick(tick);
    }
    Ok(Episode { source, input })
}

fn read_scratchpad(path: &Path) -> Result<Scratchpad> {
    let (_, text) = read_source(path)?;
    Ok(parse_scratchpad(text))
}

/// JSON scratchpads are embedded as JSON; anything else as a plain string.
fn parse_scratchpad(text: String) -> Scratchpad {
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Scratchpad::new(value),
        Err(_) => Scratchpad::new(Value::String(text.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "rescue-planner",
            "--provider",
            "ollama",
            "--strategy",
            "cot",
            "--temperature",
            "0.0",
            "--max-commands",
            "5",
            "--log-dir",
            "out",
            "s.json",
        ])
        .unwrap();
        let mut config = FileConfig::default();
        apply_cli_overrides(&cli, &mut config);

        assert_eq!(config.planning.provider, "ollama");
        assert_eq!(config.planning.strategy, "cot");
        assert_eq!(config.planning.temperature, 0.0);
        assert_eq!(config.planning.max_commands, 5);
        assert_eq!(config.planning.max_attempts, 2);
        assert_eq!(config.logging.conversation_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_parse_scratchpad() {
        let pad = parse_scratchpad(r#"{"previous_errors": ["x"]}"#.to_string());
        assert_eq!(pad.as_value()["previous_errors"][0], "x");

        let pad = parse_scratchpad("tried moving into fire\n".to_string());
        assert_eq!(pad.as_value(), &Value::String("tried moving into fire".to_string()));
    }
}
