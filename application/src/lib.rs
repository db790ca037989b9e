//! Application layer for rescue-planner
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod gateway;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::PlanningParams;
pub use gateway::{
    CallOptions, ProviderGateway,
    retry::{RetryDecision, RetryPolicy, Sleeper, ThreadSleeper},
};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{CompletionRequest, GatewayError, TextProvider},
    planning_progress::{Attempt, NoPlanningProgress, PlanOutcome, PlanningProgressNotifier},
};
pub use use_cases::plan_tick::{PlanOutput, PlanTickError, PlanTickInput, PlanTickUseCase};
