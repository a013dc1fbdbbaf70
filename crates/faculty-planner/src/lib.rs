//! Core library for the faculty workload planner.
//!
//! The `workflows` tree hosts the planning domain (plans, activity details,
//! evidence, notifications, and the workload summary report) together with the
//! activity-catalog CSV importer. `config`, `telemetry`, and `error` carry the
//! runtime plumbing shared by the API service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
