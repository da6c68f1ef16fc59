//! Infrastructure adapters for policy stores, cursor slots, run locks and
//! capacity signals.

pub mod cursor;
pub mod lock;
pub mod signals;
pub mod store;

#[cfg(feature = "tokio-runtime")]
pub use cursor::FileCursorStore;
pub use cursor::InMemoryCursorStore;
pub use lock::InMemoryRunLock;
pub use signals::{StaticLoadSensor, StaticWorkerRegistry};
pub use store::InMemoryPolicyStore;
