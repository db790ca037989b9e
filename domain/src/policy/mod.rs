//! Deterministic planning policies.

pub mod reference;

pub use reference::{DEFAULT_COMMAND_CAP, LOW_BATTERY_THRESHOLD, ReferencePolicy};
