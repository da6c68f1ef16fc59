//! Policy store backends.

pub mod memory;
pub mod sql;

pub use memory::InMemoryPolicyStore;
pub use sql::{PolicyPageQuery, render_page_query};
