//! Run lock backends.

pub mod memory;

pub use memory::InMemoryRunLock;
