//! Planning configuration from TOML (`[planning]` section)

use crate::providers::ProviderKind;
use rescue_application::PlanningParams;
use rescue_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_COMMAND_CAP, PlanningStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Accepted sampling temperature range.
const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Raw planning configuration from TOML
///
/// # Example
///
/// ```toml
/// [planning]
/// provider = "groq"           # "reference", "groq", "gemini", "ollama"
/// strategy = "reflexive"      # "reactive", "chain_of_thought", "reflexive",
///                             # "plan_then_act", "tree_of_thought"
/// model = "llama-3.3-70b-versatile"
/// temperature = 0.2
/// max_attempts = 2
/// backoff_base_secs = 2.0
/// max_commands = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlanningConfig {
    /// Backend that answers planning calls
    pub provider: String,
    /// Prompting strategy tag
    pub strategy: String,
    /// Model name; the provider default when unset
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Total provider attempts per call
    pub max_attempts: u32,
    /// Base of the exponential backoff between attempts, in seconds
    pub backoff_base_secs: f64,
    /// Command cap of the reference policy
    pub max_commands: usize,
}

impl Default for FilePlanningConfig {
    fn default() -> Self {
        Self {
            provider: "reference".to_string(),
            strategy: "reactive".to_string(),
            model: None,
            temperature: 0.2,
            max_attempts: 2,
            backoff_base_secs: 2.0,
            max_commands: DEFAULT_COMMAND_CAP,
        }
    }
}

impl FilePlanningConfig {
    /// Parse provider string into ProviderKind, returning warnings on failure.
    ///
    /// Accepts: "reference", "mock", "groq", "gemini", "ollama"
    pub fn parse_provider(&self) -> (ProviderKind, Vec<ConfigIssue>) {
        match self.provider.parse::<ProviderKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "planning.provider".to_string(),
                        value: self.provider.clone(),
                        valid_values: ProviderKind::valid_values(),
                    },
                    format!(
                        "planning.provider: unknown value '{}', falling back to 'reference'",
                        self.provider
                    ),
                );
                (ProviderKind::default(), vec![issue])
            }
        }
    }

    /// Parse strategy string into PlanningStrategy
    ///
    /// Accepts the canonical tags and the short aliases
    /// ("react", "cot", "reflexion", "plan_execute", "tot").
    pub fn parse_strategy(&self) -> (PlanningStrategy, Vec<ConfigIssue>) {
        let (strategy, recognised) = PlanningStrategy::from_tag_or_default(&self.strategy);
        if recognised {
            return (strategy, vec![]);
        }
        let issue = ConfigIssue::warning(
            ConfigIssueCode::InvalidEnumValue {
                field: "planning.strategy".to_string(),
                value: self.strategy.clone(),
                valid_values: PlanningStrategy::valid_values(),
            },
            format!(
                "planning.strategy: unknown value '{}', falling back to '{}'",
                self.strategy, strategy
            ),
        );
        (strategy, vec![issue])
    }

    fn check_temperature(&self) -> Vec<ConfigIssue> {
        if TEMPERATURE_RANGE.contains(&self.temperature) {
            return vec![];
        }
        vec![ConfigIssue::error(
            ConfigIssueCode::OutOfRange {
                field: "planning.temperature".to_string(),
                value: self.temperature.to_string(),
            },
            format!(
                "planning.temperature: {} is outside [0, 2]",
                self.temperature
            ),
        )]
    }

    fn check_max_attempts(&self) -> Vec<ConfigIssue> {
        if self.max_attempts > 0 {
            return vec![];
        }
        vec![ConfigIssue::warning(
            ConfigIssueCode::OutOfRange {
                field: "planning.max_attempts".to_string(),
                value: "0".to_string(),
            },
            "planning.max_attempts: 0 is not a usable budget, using 1",
        )]
    }

    fn backoff(&self) -> (Duration, Vec<ConfigIssue>) {
        match Duration::try_from_secs_f64(self.backoff_base_secs) {
            Ok(d) => (d, vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: "planning.backoff_base_secs".to_string(),
                        value: self.backoff_base_secs.to_string(),
                    },
                    format!(
                        "planning.backoff_base_secs: {} is not a valid delay",
                        self.backoff_base_secs
                    ),
                );
                (Duration::ZERO, vec![issue])
            }
        }
    }

    /// Build the use-case parameters, collecting every issue found on the way.
    pub fn to_planning_params(&self) -> (PlanningParams, Vec<ConfigIssue>) {
        let (strategy, mut issues) = self.parse_strategy();
        issues.extend(self.check_temperature());
        issues.extend(self.check_max_attempts());
        let (backoff, backoff_issues) = self.backoff();
        issues.extend(backoff_issues);

        let mut params = PlanningParams::default()
            .with_strategy(strategy)
            .with_temperature(self.temperature)
            .with_retry(self.max_attempts, backoff);
        if let Some(model) = self.model.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            params = params.with_model(model);
        }
        (params, issues)
    }

    /// Every issue in this section.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_provider().1;
        issues.extend(self.to_planning_params().1);
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_domain::Severity;

    #[test]
    fn test_defaults_are_clean() {
        let config = FilePlanningConfig::default();
        assert!(config.validate().is_empty());

        let (params, _) = config.to_planning_params();
        assert_eq!(params, PlanningParams::default());
        assert_eq!(config.parse_provider().0, ProviderKind::Reference);
    }

    #[test]
    fn test_unknown_provider_warns_and_falls_back() {
        let config = FilePlanningConfig {
            provider: "openai".to_string(),
            ..Default::default()
        };
        let (kind, issues) = config.parse_provider();
        assert_eq!(kind, ProviderKind::Reference);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::InvalidEnumValue { field, .. } if field == "planning.provider"
        ));
    }

    #[test]
    fn test_strategy_alias_is_accepted() {
        let config = FilePlanningConfig {
            strategy: "tot".to_string(),
            ..Default::default()
        };
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, PlanningStrategy::TreeOfThought);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_strategy_falls_back_to_reactive() {
        let config = FilePlanningConfig {
            strategy: "galaxy_brain".to_string(),
            ..Default::default()
        };
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, PlanningStrategy::Reactive);
        assert!(issues[0].message.contains("falling back to 'reactive'"));
    }

    #[test]
    fn test_temperature_out_of_range_is_an_error() {
        for temperature in [-0.1, 2.5, f32::NAN] {
            let config = FilePlanningConfig {
                temperature,
                ..Default::default()
            };
            let issues = config.validate();
            assert!(ConfigIssue::has_errors(&issues), "{temperature}");
        }
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        let config = FilePlanningConfig {
            max_attempts: 0,
            ..Default::default()
        };
        let (params, issues) = config.to_planning_params();
        assert_eq!(params.retry.max_attempts(), 1);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_negative_backoff_is_an_error() {
        let config = FilePlanningConfig {
            backoff_base_secs: -1.0,
            ..Default::default()
        };
        let (params, issues) = config.to_planning_params();
        assert!(ConfigIssue::has_errors(&issues));
        assert_eq!(params.retry.backoff_base(), Duration::ZERO);
    }

    #[test]
    fn test_model_is_passed_through() {
        let config = FilePlanningConfig {
            model: Some("gemini-1.5-pro".to_string()),
            temperature: 0.7,
            max_attempts: 4,
            backoff_base_secs: 0.5,
            ..Default::default()
        };
        let (params, issues) = config.to_planning_params();
        assert!(issues.is_empty());
        assert_eq!(params.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.retry.max_attempts(), 4);
        assert_eq!(params.retry.backoff_base(), Duration::from_millis(500));
    }

    #[test]
    fn test_blank_model_means_provider_default() {
        let config = FilePlanningConfig {
            model: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.to_planning_params().0.model, None);
    }
}
