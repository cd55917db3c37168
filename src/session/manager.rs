//! Session lifecycle: activity tracking, inactivity timers, preservation
//! and single-use restoration.
//!
//! All live-session state sits behind one async mutex. Each session owns one
//! timer task tagged with a generation number; resetting or ending a session
//! aborts the task and bumps the generation, so a timer that already woke up
//! and is waiting on the lock finds a newer generation and does nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::SessionError;

/// Snapshots never restored are discarded after this many timeouts.
pub const SNAPSHOT_RETENTION_TIMEOUTS: u32 = 48;

use super::model::{Session, SessionContext};
use super::snapshot::{PreserveReason, PreservedSession, SnapshotStore};

/// Read-only diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub active: usize,
    pub preserved: usize,
    pub oldest_session_age: Option<Duration>,
}

struct LiveSession {
    session: Session,
    last_touch: Instant,
    started: Instant,
    timer: JoinHandle<()>,
    generation: u64,
}

struct Inner {
    config: SessionConfig,
    live: Mutex<HashMap<String, LiveSession>>,
    snapshots: Arc<dyn SnapshotStore>,
    next_generation: AtomicU64,
}

/// Tracks live sessions. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    pub fn new(config: SessionConfig, snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                live: Mutex::new(HashMap::new()),
                snapshots,
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Start a session with a fresh context.
    pub async fn create_session(&self, user_id: &str, session_id: &str) -> Result<Session, SessionError> {
        let mut live = self.inner.live.lock().await;
        if live.contains_key(session_id) {
            return Err(SessionError::AlreadyActive {
                session_id: session_id.to_string(),
            });
        }

        let session = Session::new(session_id, user_id, SessionContext::new());
        live.insert(session_id.to_string(), self.inner.start(session.clone()));
        info!(session_id, user_id, "Session created");
        Ok(session)
    }

    /// The live session, if any. Preserved snapshots are never returned.
    pub async fn get_session(&self, session_id: &str) -> Option<Session> {
        self.inner
            .live
            .lock()
            .await
            .get(session_id)
            .map(|l| l.session.clone())
    }

    /// Record activity and restart the inactivity timer.
    pub async fn update_activity(&self, session_id: &str) -> Result<(), SessionError> {
        let mut live = self.inner.live.lock().await;
        let entry = live.get_mut(session_id).ok_or_else(|| timeout(session_id))?;
        self.inner.reset(session_id, entry);
        Ok(())
    }

    /// Record activity on behalf of `user_id` in one step.
    ///
    /// Returns `Ok(false)` without touching the timer when the live session
    /// belongs to someone else, and a timeout error when it is not live.
    pub async fn touch(&self, session_id: &str, user_id: &str) -> Result<bool, SessionError> {
        let mut live = self.inner.live.lock().await;
        let entry = live.get_mut(session_id).ok_or_else(|| timeout(session_id))?;
        if entry.session.user_id != user_id {
            return Ok(false);
        }
        self.inner.reset(session_id, entry);
        Ok(true)
    }

    /// Whether the session has been idle for at least the timeout. Unknown
    /// sessions count as timed out.
    pub async fn is_session_timed_out(&self, session_id: &str) -> bool {
        match self.inner.live.lock().await.get(session_id) {
            Some(l) => l.last_touch.elapsed() >= self.inner.config.timeout,
            None => true,
        }
    }

    /// Whether the session is idle past the warning threshold but not yet
    /// timed out. Unknown sessions are never near timeout.
    pub async fn is_session_near_timeout(&self, session_id: &str) -> bool {
        match self.inner.live.lock().await.get(session_id) {
            Some(l) => {
                let idle = l.last_touch.elapsed();
                idle >= self.inner.config.warning && idle < self.inner.config.timeout
            }
            None => false,
        }
    }

    /// Snapshot the live context without ending the session.
    pub async fn preserve_session_state(&self, session_id: &str) -> Result<(), SessionError> {
        let live = self.inner.live.lock().await;
        let entry = live.get(session_id).ok_or_else(|| timeout(session_id))?;
        self.inner.preserve(&entry.session, PreserveReason::Manual);
        Ok(())
    }

    /// Bind `new_session_id` to the context preserved from `old_session_id`.
    ///
    /// The snapshot is consumed: a second restore of the same old id returns
    /// `None`, as does a snapshot that belongs to another user.
    pub async fn restore_session(
        &self,
        user_id: &str,
        old_session_id: &str,
        new_session_id: &str,
    ) -> Result<Option<Session>, SessionError> {
        let mut live = self.inner.live.lock().await;
        if live.contains_key(new_session_id) {
            return Err(SessionError::AlreadyActive {
                session_id: new_session_id.to_string(),
            });
        }

        let Some(snapshot) = self.inner.snapshots.take(old_session_id, user_id) else {
            debug!(old_session_id, user_id, "No snapshot to restore");
            return Ok(None);
        };

        let session = Session::new(new_session_id, user_id, snapshot.context);
        live.insert(new_session_id.to_string(), self.inner.start(session.clone()));
        info!(old_session_id, new_session_id, user_id, "Session restored");
        Ok(Some(session))
    }

    /// Preserve and remove a live session, cancelling its timer.
    pub async fn end_session(&self, session_id: &str) -> Result<(), SessionError> {
        let mut live = self.inner.live.lock().await;
        let entry = live.remove(session_id).ok_or_else(|| timeout(session_id))?;
        entry.timer.abort();
        self.inner.preserve(&entry.session, PreserveReason::Ended);
        info!(session_id, "Session ended");
        Ok(())
    }

    /// End every live session idle for at least the timeout and discard
    /// snapshots older than [`SNAPSHOT_RETENTION_TIMEOUTS`] timeouts.
    /// Returns how many sessions were ended.
    pub async fn cleanup_expired_sessions(&self) -> usize {
        let mut live = self.inner.live.lock().await;
        let expired: Vec<String> = live
            .iter()
            .filter(|(_, l)| l.last_touch.elapsed() >= self.inner.config.timeout)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            if let Some(entry) = live.remove(id) {
                entry.timer.abort();
                self.inner.preserve(&entry.session, PreserveReason::Timeout);
            }
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "Cleaned up expired sessions");
        }

        let cutoff = self
            .inner
            .config
            .timeout
            .checked_mul(SNAPSHOT_RETENTION_TIMEOUTS)
            .and_then(|retention| chrono::Duration::from_std(retention).ok())
            .and_then(|retention| Utc::now().checked_sub_signed(retention));
        if let Some(cutoff) = cutoff {
            let discarded = self.inner.snapshots.discard_older_than(cutoff);
            if discarded > 0 {
                info!(count = discarded, "Discarded unrestored session snapshots");
            }
        }
        expired.len()
    }

    /// Live sessions owned by `user_id`, oldest first.
    pub async fn get_user_sessions(&self, user_id: &str) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .inner
            .live
            .lock()
            .await
            .values()
            .filter(|l| l.session.user_id == user_id)
            .map(|l| l.session.clone())
            .collect();
        sessions.sort_by_key(|s| s.started_at);
        sessions
    }

    pub async fn get_stats(&self) -> SessionStats {
        let live = self.inner.live.lock().await;
        SessionStats {
            active: live.len(),
            preserved: self.inner.snapshots.count(),
            oldest_session_age: live.values().map(|l| l.started.elapsed()).max(),
        }
    }

    /// Apply `f` to a live session's context.
    pub async fn update_context<F, R>(&self, session_id: &str, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut SessionContext) -> R,
    {
        let mut live = self.inner.live.lock().await;
        let entry = live.get_mut(session_id).ok_or_else(|| timeout(session_id))?;
        Ok(f(&mut entry.session.context))
    }
}

impl Inner {
    fn generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    fn start(self: &Arc<Self>, session: Session) -> LiveSession {
        let generation = self.generation();
        let now = Instant::now();
        LiveSession {
            timer: self.spawn_timer(session.id.clone(), generation),
            session,
            last_touch: now,
            started: now,
            generation,
        }
    }

    fn reset(self: &Arc<Self>, session_id: &str, entry: &mut LiveSession) {
        entry.timer.abort();
        let generation = self.generation();
        entry.generation = generation;
        entry.timer = self.spawn_timer(session_id.to_string(), generation);
        entry.last_touch = Instant::now();
        entry.session.last_activity = Utc::now();
        debug!(session_id, generation, "Session activity");
    }

    fn spawn_timer(self: &Arc<Self>, session_id: String, generation: u64) -> JoinHandle<()> {
        let inner: Weak<Inner> = Arc::downgrade(self);
        let timeout = self.config.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = inner.upgrade() {
                inner.expire(&session_id, generation).await;
            }
        })
    }

    /// Timer callback. Only acts if no reset or end happened since the timer
    /// was scheduled.
    async fn expire(&self, session_id: &str, generation: u64) {
        let mut live = self.live.lock().await;
        match live.get(session_id) {
            Some(entry) if entry.generation == generation => {}
            _ => {
                debug!(session_id, generation, "Stale session timer");
                return;
            }
        }
        if let Some(entry) = live.remove(session_id) {
            self.preserve(&entry.session, PreserveReason::Timeout);
            info!(session_id, "Session timed out");
        }
    }

    fn preserve(&self, session: &Session, reason: PreserveReason) {
        self.snapshots.put(PreservedSession {
            session_id: session.id.clone(),
            user_id: session.user_id.clone(),
            context: session.context.clone(),
            preserved_at: Utc::now(),
            reason,
        });
        debug!(session_id = %session.id, ?reason, "Session state preserved");
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for entry in self.live.get_mut().values() {
            entry.timer.abort();
        }
    }
}

fn timeout(session_id: &str) -> SessionError {
    SessionError::Timeout {
        session_id: session_id.to_string(),
    }
}

/// Spawn a background task that periodically ends expired sessions.
pub fn spawn_cleanup_task(manager: SessionManager, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            manager.cleanup_expired_sessions().await;
        }
    })
}
