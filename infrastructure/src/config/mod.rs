//! Configuration file loading for rescue-planner
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `RESCUE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./rescue-planner.toml` or `./.rescue-planner.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/rescue-planner/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileGeminiConfig, FileGroqConfig, FileLoggingConfig, FileOllamaConfig,
    FilePlanningConfig, FileProvidersConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
