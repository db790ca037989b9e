//! Output formatter trait

use rescue_application::PlanOutput;

/// Trait for formatting planning results, one snapshot at a time
pub trait OutputFormatter: Send + Sync {
    /// Format the result of planning `source`
    fn format_plan(&self, source: &str, output: &PlanOutput) -> String;

    /// Format a planning call that ended in an error
    fn format_failure(&self, source: &str, error: &str) -> String;
}
