//! Infrastructure layer for rescue-planner
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: text-generation backends, configuration
//! file loading and conversation logging.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileGeminiConfig, FileGroqConfig, FileLoggingConfig,
    FileOllamaConfig, FilePlanningConfig, FileProvidersConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{
    GeminiProvider, GroqProvider, OllamaProvider, ProviderKind, ReferenceProvider,
    create_provider,
};
