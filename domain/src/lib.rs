//! Domain layer for rescue-planner
//!
//! This crate contains the pure planning logic: no I/O, no logging.
//!
//! # Core Concepts
//!
//! ## Strategies
//!
//! A [`PlanningStrategy`] turns a [`WorldSnapshot`] (and an optional
//! [`Scratchpad`]) into the [`Message`] sequence sent to a provider.
//!
//! ## Command batches
//!
//! Model replies are free text. [`extract_and_validate`] pulls the command
//! batch out of them and checks it against a closed schema, producing a
//! [`CommandBatch`] or a [`ValidationError`].
//!
//! ## Reference policy
//!
//! [`ReferencePolicy`] is the deterministic greedy dispatcher used when no
//! live model is configured.

pub mod command;
pub mod config;
pub mod core;
pub mod policy;
pub mod prompt;
pub mod session;
pub mod strategy;
pub mod world;

// Re-export commonly used types
pub use command::{
    entities::{Command, CommandBatch, Directive, actions},
    parsing::{extract_and_validate, extract_candidate, validate_batch},
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{error::ValidationError, position::GridPos};
pub use policy::{DEFAULT_COMMAND_CAP, LOW_BATTERY_THRESHOLD, ReferencePolicy};
pub use prompt::{CONTEXT_MARKER, FINAL_JSON_MARKER, PlanningPrompts};
pub use session::entities::{Message, Role};
pub use strategy::PlanningStrategy;
pub use world::{
    snapshot::{Scratchpad, WorldSnapshot},
    view::{AgentKind, AgentView, WorldView},
};
