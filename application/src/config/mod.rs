//! Application configuration
//!
//! Run-level parameters consumed by the use cases. File and environment
//! loading lives in the infrastructure layer.

pub mod planning_params;

pub use planning_params::PlanningParams;
