//! Command batches: the structured result of one planning call.
//!
//! - [`entities`]: [`Command`](entities::Command) and [`CommandBatch`](entities::CommandBatch)
//! - [`parsing`]: extraction and closed-schema validation of model replies

pub mod entities;
pub mod parsing;
