//! Persistence layer: the `DataStore` contract, an in-memory backend and
//! the retry decorator.

pub mod integrity;
pub mod memory;
pub mod retry;
pub mod traits;

pub use memory::InMemoryStore;
pub use retry::{RetryPolicy, RetryingStore, with_retry};
pub use traits::{DataStore, ProgressEntry};
