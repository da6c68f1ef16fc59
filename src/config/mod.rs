//! Configuration models for budgets, cursor persistence and scheduling.

pub mod sweeper;

pub use sweeper::SweeperConfig;
