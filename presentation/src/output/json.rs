//! JSON lines output: one object per planned snapshot

use crate::output::formatter::OutputFormatter;
use rescue_application::{PlanOutcome, PlanOutput};
use rescue_domain::Command;
use serde::Serialize;

#[derive(Serialize)]
struct PlanRecord<'a> {
    source: &'a str,
    outcome: PlanOutcome,
    commands: &'a [Command],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<&'a str>,
}

#[derive(Serialize)]
struct FailureRecord<'a> {
    source: &'a str,
    error: &'a str,
}

/// Formats planning results as compact JSON, one line per snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    show_raw: bool,
}

impl JsonFormatter {
    pub fn new(show_raw: bool) -> Self {
        Self { show_raw }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_plan(&self, source: &str, output: &PlanOutput) -> String {
        let record = PlanRecord {
            source,
            outcome: output.outcome,
            commands: &output.batch.commands,
            issues: output.issues.iter().map(|e| e.to_string()).collect(),
            raw_response: self.show_raw.then_some(output.raw_response.as_str()),
        };
        serde_json::to_string(&record).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_failure(&self, source: &str, error: &str) -> String {
        serde_json::to_string(&FailureRecord { source, error })
            .unwrap_or_else(|_| "{}".to_string())
    }
}
