//! Text provider port
//!
//! Defines the interface for turning a message sequence into reply text.
//! Implementations (the reference policy adapter and the remote backends)
//! live in the infrastructure layer.

use rescue_domain::Message;
use thiserror::Error;

/// Errors that can occur during provider calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network fault, timeout, backend error status or empty reply.
    /// Eligible for retry.
    #[error("Transient provider failure: {0}")]
    Transient(String),

    /// The provider cannot be used at all (e.g. missing API key).
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Every attempt in the retry budget failed transiently.
    #[error("Provider failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl GatewayError {
    /// Check if this error may go away on a later attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Transient(_))
    }
}

/// Per-call sampling parameters, resolved against provider defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
}

/// A backend that turns messages into text.
///
/// Calls are blocking. A provider keeps no state between calls that could
/// change its answer for the same input.
pub trait TextProvider: Send + Sync {
    /// Short name used in logs (e.g. "reference", "groq").
    fn name(&self) -> &str;

    /// Model used when the caller does not name one.
    fn default_model(&self) -> &str;

    /// Send the messages and return the reply text.
    fn complete(
        &self,
        messages: &[Message],
        request: &CompletionRequest,
    ) -> Result<String, GatewayError>;
}
