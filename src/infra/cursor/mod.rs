//! Cursor slot backends.

#[cfg(feature = "tokio-runtime")]
pub mod file;
pub mod memory;

#[cfg(feature = "tokio-runtime")]
pub use file::FileCursorStore;
pub use memory::InMemoryCursorStore;
