//! Core domain concepts shared across all subdomains.
//!
//! - [`position::GridPos`]: a tile on the simulation grid
//! - [`error::ValidationError`]: why a model reply was rejected

pub mod error;
pub mod position;
