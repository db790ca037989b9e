//! World state handed to the planner by the simulation loop.
//!
//! [`snapshot::WorldSnapshot`] and [`snapshot::Scratchpad`] are opaque,
//! read-only inputs. [`view::WorldView`] is the lenient typed reading of a
//! snapshot used by the reference policy.

pub mod snapshot;
pub mod view;
