//! Bounded retry with exponential backoff for data store calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::StoreError;
use crate::profile::UserProfile;
use crate::session::ChatMessage;

use super::traits::{DataStore, ProgressEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based): base, 2×base, 4×base, …
    /// capped at `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << retry.min(16))
            .min(self.max_delay)
    }
}

/// Run `op`, retrying recoverable failures per `policy`.
///
/// Non-recoverable errors return immediately. After the last attempt the
/// final error is returned.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_recoverable() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt - 1);
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Store call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Decorates any `DataStore` with [`with_retry`].
pub struct RetryingStore {
    inner: Arc<dyn DataStore>,
    policy: RetryPolicy,
}

impl RetryingStore {
    pub fn new(inner: Arc<dyn DataStore>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl DataStore for RetryingStore {
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        with_retry(&self.policy, "save_profile", move || self.inner.save_profile(profile)).await
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        with_retry(&self.policy, "get_profile", move || self.inner.get_profile(user_id)).await
    }

    async fn save_messages(&self, session_id: &str, messages: &[ChatMessage]) -> Result<(), StoreError> {
        with_retry(&self.policy, "save_messages", move || self.inner.save_messages(session_id, messages)).await
    }

    async fn get_messages(&self, session_id: &str, limit: Option<usize>) -> Result<Vec<ChatMessage>, StoreError> {
        with_retry(&self.policy, "get_messages", move || self.inner.get_messages(session_id, limit)).await
    }

    async fn record_completed_action(&self, user_id: &str, action_id: &str) -> Result<(), StoreError> {
        with_retry(&self.policy, "record_completed_action", move || {
            self.inner.record_completed_action(user_id, action_id)
        })
        .await
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<ProgressEntry>, StoreError> {
        with_retry(&self.policy, "list_progress", move || self.inner.list_progress(user_id)).await
    }
}
