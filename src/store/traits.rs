//! `DataStore`: single async interface for coaching persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::profile::UserProfile;
use crate::session::ChatMessage;

/// One entry in a user's progress history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub user_id: String,
    pub action_id: String,
    pub completed_at: DateTime<Utc>,
}

/// Backend-agnostic persistence for profiles, message histories and
/// progress.
///
/// Every call may fail with a recoverable [`StoreError::Unavailable`] or a
/// non-recoverable integrity / validation error.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Validate and store a profile, replacing any previous version.
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    /// Load a profile. `Ok(None)` if the user has none yet.
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Replace the stored history for a session.
    async fn save_messages(&self, session_id: &str, messages: &[ChatMessage]) -> Result<(), StoreError>;

    /// Stored history for a session, oldest first. `limit` keeps only the
    /// most recent N messages.
    async fn get_messages(&self, session_id: &str, limit: Option<usize>) -> Result<Vec<ChatMessage>, StoreError>;

    /// Add an action to the user's completed set. Completing the same action
    /// twice leaves the set and the progress log unchanged.
    async fn record_completed_action(&self, user_id: &str, action_id: &str) -> Result<(), StoreError>;

    /// Progress history for a user, oldest first.
    async fn list_progress(&self, user_id: &str) -> Result<Vec<ProgressEntry>, StoreError>;
}
