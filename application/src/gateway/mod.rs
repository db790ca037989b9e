//! Provider gateway: one blocking `call` over any [`TextProvider`], with
//! bounded retry on transient failure.

pub mod retry;

use crate::ports::llm_gateway::{CompletionRequest, GatewayError, TextProvider};
use rescue_domain::Message;
use retry::{RetryDecision, RetryPolicy, Sleeper, ThreadSleeper};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Per-call options. `model` falls back to the provider's default.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOptions {
    pub model: Option<String>,
    pub temperature: f32,
    pub retry: RetryPolicy,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.2,
            retry: RetryPolicy::default(),
        }
    }
}

/// Retrying front of a [`TextProvider`].
pub struct ProviderGateway {
    provider: Arc<dyn TextProvider>,
    sleeper: Arc<dyn Sleeper>,
}

impl ProviderGateway {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self {
            provider,
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    /// Replace the sleeper (tests use one that records instead of waiting).
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Model a call with these options will use.
    pub fn resolve_model(&self, options: &CallOptions) -> String {
        options
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// Send `messages` and return the reply text.
    ///
    /// Transient failures are retried up to the policy's budget, sleeping
    /// `backoff_base * 2^attempt` in between. Exhausting the budget yields
    /// [`GatewayError::RetriesExhausted`]; other errors return immediately.
    pub fn call(&self, messages: &[Message], options: &CallOptions) -> Result<String, GatewayError> {
        let request = CompletionRequest {
            model: self.resolve_model(options),
            temperature: options.temperature,
        };

        let mut attempt = 0u32;
        loop {
            debug!(
                "Calling provider {} (model {}, attempt {}/{})",
                self.provider.name(),
                request.model,
                attempt + 1,
                options.retry.max_attempts()
            );

            let err = match self.provider.complete(messages, &request) {
                Ok(text) => return Ok(text),
                Err(e) => e,
            };

            match options.retry.decide(attempt, &err) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(
                        "Provider {} attempt {} failed: {} (retrying in {:?})",
                        self.provider.name(),
                        attempt + 1,
                        err,
                        delay
                    );
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
                RetryDecision::GiveUp if err.is_transient() => {
                    error!(
                        "Provider {} failed after {} attempt(s): {}",
                        self.provider.name(),
                        attempt + 1,
                        err
                    );
                    return Err(GatewayError::RetriesExhausted {
                        attempts: attempt + 1,
                        last_error: err.to_string(),
                    });
                }
                RetryDecision::GiveUp => return Err(err),
            }
        }
    }
}
