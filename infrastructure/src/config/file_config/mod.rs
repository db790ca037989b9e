//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion into application types
//! happens in the `parse_*`/`to_*` methods, which report problems as
//! [`ConfigIssue`]s instead of failing.

mod logging;
mod planning;
mod providers;

pub use logging::FileLoggingConfig;
pub use planning::FilePlanningConfig;
pub use providers::{FileGeminiConfig, FileGroqConfig, FileOllamaConfig, FileProvidersConfig};

use rescue_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Planning call settings
    pub planning: FilePlanningConfig,
    /// Backend settings
    pub providers: FileProvidersConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Enum parse failures (provider, strategy)
    /// 2. Numeric ranges (temperature, attempt budget, backoff)
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.planning.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderKind;
    use rescue_domain::PlanningStrategy;
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[planning]
provider = "groq"
strategy = "chain_of_thought"
model = "llama-3.1-8b-instant"
temperature = 0.4
max_attempts = 3
backoff_base_secs = 1.5
max_commands = 5

[providers.groq]
api_key_env = "MY_GROQ_KEY"
timeout_secs = 30

[providers.ollama]
base_url = "http://gpu-box:11434"

[logging]
conversation_dir = "logs"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.planning.parse_provider().0, ProviderKind::Groq);
        assert_eq!(
            config.planning.parse_strategy().0,
            PlanningStrategy::ChainOfThought
        );
        assert_eq!(config.planning.max_commands, 5);
        assert_eq!(config.providers.groq.api_key_env, "MY_GROQ_KEY");
        assert_eq!(config.providers.groq.timeout_secs, 30);
        // untouched keys keep their defaults
        assert_eq!(
            config.providers.groq.base_url,
            "https://api.groq.com/openai/v1"
        );
        assert_eq!(config.providers.ollama.base_url, "http://gpu-box:11434");
        assert_eq!(config.providers.ollama.default_model, "gemma3n:e4b");
        assert_eq!(
            config.logging.conversation_dir,
            Some(PathBuf::from("logs"))
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[planning]
strategy = "reflexion"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.planning.parse_strategy().0,
            PlanningStrategy::Reflexive
        );
        assert_eq!(config.planning.provider, "reference");
        assert_eq!(config.planning.max_attempts, 2);
        assert!(config.logging.conversation_dir.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.planning.temperature, 0.2);
        assert_eq!(config.planning.backoff_base_secs, 2.0);
        assert_eq!(config.planning.max_commands, 3);
        assert_eq!(config.providers.gemini.default_model, "gemini-1.5-flash");
        assert_eq!(config.providers.ollama.timeout_secs, 120);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[planning]
provider = "openai"
strategy = "vibes"
temperature = 3.0
max_attempts = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert!(ConfigIssue::has_errors(&issues));
    }
}
