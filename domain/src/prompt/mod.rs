//! Prompt templates.

pub mod planning;

pub use planning::{
    CONTEXT_MARKER, FINAL_JSON_MARKER, PlanningPrompts, REASONING_MARKER, SCRATCHPAD_MARKER,
};
