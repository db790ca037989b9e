//! Planning parameters: per-run control of the planning use case.
//!
//! [`PlanningParams`] groups the static parameters of
//! [`PlanTickUseCase`](crate::use_cases::plan_tick::PlanTickUseCase): which
//! strategy builds the prompt and how the provider is called. They are
//! built once at startup and passed in; nothing here is read from the
//! environment.

use crate::gateway::CallOptions;
use crate::gateway::retry::RetryPolicy;
use rescue_domain::PlanningStrategy;
use std::time::Duration;
use tracing::warn;

/// Planning call parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningParams {
    /// Prompting strategy.
    pub strategy: PlanningStrategy,
    /// Model name; `None` uses the provider default.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Provider attempt budget and backoff.
    pub retry: RetryPolicy,
}

impl Default for PlanningParams {
    fn default() -> Self {
        Self {
            strategy: PlanningStrategy::default(),
            model: None,
            temperature: 0.2,
            retry: RetryPolicy::default(),
        }
    }
}

impl PlanningParams {
    // ==================== Builder Methods ====================

    pub fn with_strategy(mut self, strategy: PlanningStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the strategy from a config/CLI tag. Unknown tags fall back to
    /// `reactive` with a warning.
    pub fn with_strategy_tag(mut self, tag: &str) -> Self {
        let (strategy, recognised) = PlanningStrategy::from_tag_or_default(tag);
        if !recognised {
            warn!("Unknown strategy '{}', defaulting to {}", tag, strategy);
        }
        self.strategy = strategy;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_retry(mut self, max_attempts: u32, backoff_base: Duration) -> Self {
        self.retry = RetryPolicy::new(max_attempts, backoff_base);
        self
    }

    pub fn call_options(&self) -> CallOptions {
        CallOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            retry: self.retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PlanningParams::default();
        assert_eq!(params.strategy, PlanningStrategy::Reactive);
        assert_eq!(params.model, None);
        assert_eq!(params.temperature, 0.2);
        assert_eq!(params.retry.max_attempts(), 2);
        assert_eq!(params.retry.backoff_base(), Duration::from_secs(2));
    }

    #[test]
    fn test_builder_chain() {
        let params = PlanningParams::default()
            .with_strategy_tag("tot")
            .with_model("gemini-1.5-flash")
            .with_temperature(0.7)
            .with_retry(4, Duration::from_millis(250));
        assert_eq!(params.strategy, PlanningStrategy::TreeOfThought);

        let options = params.call_options();
        assert_eq!(options.model.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.retry.max_attempts(), 4);
    }

    #[test]
    fn test_unknown_strategy_tag_falls_back() {
        let params = PlanningParams::default()
            .with_strategy(PlanningStrategy::Reflexive)
            .with_strategy_tag("beam_search");
        assert_eq!(params.strategy, PlanningStrategy::Reactive);
    }
}
