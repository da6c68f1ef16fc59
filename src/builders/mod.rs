//! Builders to construct sweep components from configuration.

pub mod job_builder;

pub use job_builder::{SweepCapabilities, build_sweep_job};
