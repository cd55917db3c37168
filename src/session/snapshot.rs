//! Preserved session snapshots.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::SessionContext;

/// Why a session's context was preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreserveReason {
    Timeout,
    Ended,
    Manual,
}

/// A by-value copy of a session's context, restorable once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreservedSession {
    pub session_id: String,
    pub user_id: String,
    pub context: SessionContext,
    pub preserved_at: DateTime<Utc>,
    pub reason: PreserveReason,
}

/// Storage for preserved snapshots, keyed by the session id they came from.
pub trait SnapshotStore: Send + Sync {
    /// Store a snapshot, replacing any earlier one for the same session.
    fn put(&self, snapshot: PreservedSession);

    /// Remove and return the snapshot for `session_id` if it belongs to
    /// `user_id`. A snapshot owned by someone else stays in place.
    fn take(&self, session_id: &str, user_id: &str) -> Option<PreservedSession>;

    /// Drop every snapshot preserved before `cutoff`. Returns how many were
    /// dropped.
    fn discard_older_than(&self, cutoff: DateTime<Utc>) -> usize;

    fn count(&self) -> usize;
}

#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshots: Mutex<HashMap<String, PreservedSession>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PreservedSession>> {
        self.snapshots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn put(&self, snapshot: PreservedSession) {
        self.lock().insert(snapshot.session_id.clone(), snapshot);
    }

    fn take(&self, session_id: &str, user_id: &str) -> Option<PreservedSession> {
        let mut snapshots = self.lock();
        match snapshots.get(session_id) {
            Some(s) if s.user_id == user_id => snapshots.remove(session_id),
            _ => None,
        }
    }

    fn discard_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut snapshots = self.lock();
        let before = snapshots.len();
        snapshots.retain(|_, s| s.preserved_at >= cutoff);
        before - snapshots.len()
    }

    fn count(&self) -> usize {
        self.lock().len()
    }
}
