//! Session lifecycle and conversation context.

pub mod manager;
pub mod model;
pub mod snapshot;

pub use manager::{SessionManager, SessionStats, spawn_cleanup_task};
pub use model::{ChatMessage, Role, Session, SessionContext};
pub use snapshot::{InMemorySnapshotStore, PreserveReason, PreservedSession, SnapshotStore};
