//! Text-generation providers.
//!
//! Every backend implements the [`TextProvider`] port. [`create_provider`]
//! builds the one selected by [`ProviderKind`] from the `[providers]`
//! config section, reading credentials once at construction time.

mod gemini;
mod groq;
mod http;
mod ollama;
mod reference;

pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use ollama::OllamaProvider;
pub use reference::ReferenceProvider;

use crate::config::FileProvidersConfig;
use rescue_application::ports::llm_gateway::{GatewayError, TextProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Which backend answers planning calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Deterministic greedy policy; needs no network.
    #[default]
    Reference,
    /// Groq, OpenAI-compatible chat completions.
    Groq,
    /// Google Gemini `generateContent`.
    Gemini,
    /// Local Ollama server.
    Ollama,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Reference,
        ProviderKind::Groq,
        ProviderKind::Gemini,
        ProviderKind::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Reference => "reference",
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn valid_values() -> Vec<String> {
        Self::ALL.iter().map(|k| k.as_str().to_string()).collect()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reference" | "mock" => Ok(ProviderKind::Reference),
            "groq" => Ok(ProviderKind::Groq),
            "gemini" => Ok(ProviderKind::Gemini),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(format!("Invalid ProviderKind: {}", s)),
        }
    }
}

/// Build the provider for `kind`.
///
/// `max_commands` caps the reference policy and is ignored by remote
/// backends. Fails with [`GatewayError::NotConfigured`] when a required
/// API key is missing or the HTTP client cannot be built.
pub fn create_provider(
    kind: ProviderKind,
    config: &FileProvidersConfig,
    max_commands: usize,
) -> Result<Arc<dyn TextProvider>, GatewayError> {
    let provider: Arc<dyn TextProvider> = match kind {
        ProviderKind::Reference => Arc::new(ReferenceProvider::new(max_commands)),
        ProviderKind::Groq => Arc::new(GroqProvider::from_config(&config.groq)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::from_config(&config.gemini)?),
        ProviderKind::Ollama => Arc::new(OllamaProvider::from_config(&config.ollama)?),
    };
    info!(
        "Using provider {} (default model {})",
        provider.name(),
        provider.default_model()
    );
    Ok(provider)
}
