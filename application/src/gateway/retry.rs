//! Bounded exponential-backoff retry.
//!
//! The decision of whether and how long to wait is a pure function of the
//! attempt counter and the error ([`RetryPolicy::decide`]); sleeping goes
//! through the [`Sleeper`] port so tests never wait in real time.

use crate::ports::llm_gateway::GatewayError;
use std::time::Duration;

/// Attempt budget and backoff base for provider calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never below 1.
    max_attempts: u32,
    /// Delay before the second attempt; doubles for each later one.
    backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_secs(2))
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

impl RetryPolicy {
    /// A budget of 0 is treated as 1: a call always makes one attempt.
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// `backoff_base * 2^attempt`, saturating. `attempt` counts from 0.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.backoff_base.is_zero() {
            return Duration::ZERO;
        }
        2u32.checked_pow(attempt)
            .and_then(|factor| self.backoff_base.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Decide after attempt number `attempt` (from 0) failed with `error`.
    pub fn decide(&self, attempt: u32, error: &GatewayError) -> RetryDecision {
        if !error.is_transient() || attempt.saturating_add(1) >= self.max_attempts {
            return RetryDecision::GiveUp;
        }
        RetryDecision::RetryAfter(self.delay_for(attempt))
    }
}

/// Blocking wait between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
