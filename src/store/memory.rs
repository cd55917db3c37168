//! In-memory `DataStore`.
//!
//! Profiles are kept as JSON records, so every read goes through the same
//! structural integrity checks a persistent backend would need.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, ValidationError};
use crate::profile::UserProfile;
use crate::session::ChatMessage;

use super::integrity::check_profile;
use super::traits::{DataStore, ProgressEntry};

#[derive(Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<String, Value>>,
    messages: RwLock<HashMap<String, Vec<ChatMessage>>>,
    progress: RwLock<HashMap<String, Vec<ProgressEntry>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw profile record without validation. Used to load external
    /// data and to simulate corruption.
    pub async fn put_raw_profile(&self, user_id: &str, record: Value) {
        self.profiles.write().await.insert(user_id.to_string(), record);
    }
}

fn decode(user_id: &str, record: &Value) -> Result<UserProfile, StoreError> {
    check_profile(user_id, record)?;
    serde_json::from_value(record.clone()).map_err(|e| StoreError::Integrity {
        record: format!("profile {user_id}"),
        reason: e.to_string(),
    })
}

fn encode(profile: &UserProfile) -> Result<Value, StoreError> {
    serde_json::to_value(profile).map_err(|e| StoreError::Integrity {
        record: format!("profile {}", profile.id),
        reason: e.to_string(),
    })
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        profile.validate()?;
        let record = encode(profile)?;
        self.profiles.write().await.insert(profile.id.clone(), record);
        debug!(user_id = %profile.id, "Saved profile");
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        match self.profiles.read().await.get(user_id) {
            Some(record) => decode(user_id, record).map(Some),
            None => Ok(None),
        }
    }

    async fn save_messages(&self, session_id: &str, messages: &[ChatMessage]) -> Result<(), StoreError> {
        self.messages
            .write()
            .await
            .insert(session_id.to_string(), messages.to_vec());
        Ok(())
    }

    async fn get_messages(&self, session_id: &str, limit: Option<usize>) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.read().await;
        let Some(history) = messages.get(session_id) else {
            return Ok(Vec::new());
        };
        let skip = limit.map_or(0, |n| history.len().saturating_sub(n));
        Ok(history[skip..].to_vec())
    }

    async fn record_completed_action(&self, user_id: &str, action_id: &str) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let record = profiles.get_mut(user_id).ok_or_else(|| ValidationError::Invalid {
            field: "user_id".to_string(),
            reason: format!("no profile for {user_id}"),
        })?;

        let mut profile = decode(user_id, record)?;
        if !profile.progress.completed_actions.insert(action_id.to_string()) {
            debug!(user_id, action_id, "Action already completed");
            return Ok(());
        }

        let now = Utc::now();
        profile.progress.last_updated = now;
        *record = encode(&profile)?;

        self.progress
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(ProgressEntry {
                user_id: user_id.to_string(),
                action_id: action_id.to_string(),
                completed_at: now,
            });
        debug!(user_id, action_id, "Recorded completed action");
        Ok(())
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<ProgressEntry>, StoreError> {
        Ok(self.progress.read().await.get(user_id).cloned().unwrap_or_default())
    }
}
