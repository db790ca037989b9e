//! Use cases (application services)

pub mod plan_tick;
