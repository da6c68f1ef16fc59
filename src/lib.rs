//! # Prometheus Sweeper
//!
//! A periodic, budget-bounded cleanup scheduler for per-account retention
//! policies.
//!
//! Every invocation decides which policies get cleanup work and how much, so
//! that:
//!
//! - **Total work stays bounded**: the run budget follows live downstream
//!   capacity (`per_thread_budget * live_workers`) and is capped by
//!   `max_budget`.
//! - **Nothing is starved**: a cursor persisted across runs lets a collection
//!   far larger than one run's budget be covered over several runs.
//! - **Busy accounts come first**: once a run has covered the whole ring it
//!   only revisits policies that actually produced work.
//!
//! ## Components
//!
//! - [`core::BudgetPlanner`] sizes the run from the worker registry.
//! - [`core::SweepController`] walks the policies, invokes the executor under a
//!   per-policy cap and persists the resumption cursor.
//! - [`core::SweepJob`] wraps both behind a run lock; [`runtime::start_sweep_worker`]
//!   fires it on an interval.
//!
//! Collaborators (policy store, executor, cursor slot, load sensor, worker
//! registry, run lock) are injected as traits from [`core`]; [`infra`] ships
//! in-memory and file-backed adapters.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prometheus_sweeper::builders::{SweepCapabilities, build_sweep_job};
//! use prometheus_sweeper::config::SweeperConfig;
//!
//! let cfg = SweeperConfig::from_env()?;
//! let job = build_sweep_job(&cfg, capabilities)?;
//! let outcome = job.invoke().await?;
//! ```
//!
//! For complete examples, see `tests/sweep_algorithm_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core sweep abstractions, budget sizing and the iteration state machine.
pub mod core;
/// Configuration models for budgets, cursor persistence and scheduling.
pub mod config;
/// Builders to construct sweep jobs from configuration.
pub mod builders;
/// Infrastructure adapters for stores, cursor slots, locks and signals.
pub mod infra;
/// Runtime adapters driving sweeps on a schedule.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;
