//! The coaching orchestrator and the response types it produces.

pub mod compose;
pub mod fallback;
pub mod orchestrator;
pub mod response;

pub use fallback::FallbackContext;
pub use orchestrator::Orchestrator;
pub use response::{CoachRequest, CoachResponse, DEFAULT_FOLLOW_UP, is_actionable};
