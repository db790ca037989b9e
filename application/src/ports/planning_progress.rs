//! Planning progress port
//!
//! Lets a caller observe the corrective cycle of a planning call, in
//! particular the fail-safe degradation, which is not surfaced as an error.

use rescue_domain::{CommandBatch, ValidationError};
use serde::Serialize;
use std::fmt;

/// Which provider round of a planning call is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attempt {
    /// The strategy's own message sequence.
    Initial,
    /// The original sequence plus the corrective instruction.
    Corrective,
}

impl Attempt {
    /// 1-based attempt number, for logs.
    pub fn number(&self) -> u32 {
        match self {
            Attempt::Initial => 1,
            Attempt::Corrective => 2,
        }
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attempt::Initial => write!(f, "initial"),
            Attempt::Corrective => write!(f, "corrective"),
        }
    }
}

/// How a planning call reached its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOutcome {
    /// The first reply validated.
    Accepted,
    /// The first reply was rejected, the corrective reply validated.
    Corrected,
    /// Both replies were rejected; the empty batch was returned.
    FailSafe,
}

impl PlanOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanOutcome::Accepted => "accepted",
            PlanOutcome::Corrected => "corrected",
            PlanOutcome::FailSafe => "fail_safe",
        }
    }
}

impl fmt::Display for PlanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback for progress updates during a planning call
///
/// Implementations live in the presentation layer (console) or in the
/// caller's episode loop (metrics such as invalid-reply counts).
pub trait PlanningProgressNotifier: Send + Sync {
    /// Called before each provider round
    fn on_attempt_started(&self, _attempt: Attempt) {}

    /// Called when a reply fails extraction or schema checks
    fn on_validation_failed(&self, _attempt: Attempt, _error: &ValidationError) {}

    /// Called when both rounds failed and the empty batch is returned
    fn on_fail_safe(&self, _error: &ValidationError) {}

    /// Called once with the batch handed back to the caller
    fn on_plan_ready(&self, _batch: &CommandBatch, _outcome: PlanOutcome) {}
}

/// No-op notifier for when progress reporting is not needed
pub struct NoPlanningProgress;

impl PlanningProgressNotifier for NoPlanningProgress {}
