//! Application layer: the planner service and the per-message plan builder.

mod plan_builder;
mod protocols;
pub mod service;

pub use service::ProtectionPlanner;
