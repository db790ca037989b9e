//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording the planning
//! exchange (prompts, raw replies, validation failures, outcomes) to a
//! structured log, one record per event.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! transcript in a machine-readable format (JSONL) for later comparison of
//! strategies.

use serde_json::Value;

/// Event type identifiers written by the planning use case.
pub mod event_types {
    pub const PLANNING_REQUEST: &str = "planning_request";
    pub const PLANNING_RESPONSE: &str = "planning_response";
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const PROVIDER_FAILED: &str = "provider_failed";
    pub const PLAN_COMPLETED: &str = "plan_completed";
}

/// A structured conversation event for logging.
///
/// The logger adds the timestamp when it writes the record.
pub struct ConversationEvent {
    /// Event type identifier, one of [`event_types`].
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and infallible: a logging failure must never
/// disturb a planning call.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
