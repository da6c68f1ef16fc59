//! Runtime adapters driving sweeps on a schedule.

pub mod worker;

pub use worker::start_sweep_worker;
