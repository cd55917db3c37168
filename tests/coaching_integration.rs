//! End-to-end tests for the coaching orchestrator.
//!
//! Each test wires a real `SessionManager` and an in-memory store (optionally
//! behind a fault-injecting wrapper) into an `Orchestrator` and drives it the
//! way a channel would.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;

use career_coach::classify::IntentKind;
use career_coach::coach::{CoachRequest, FallbackContext, Orchestrator, is_actionable};
use career_coach::config::{CoachConfig, SessionConfig};
use career_coach::error::StoreError;
use career_coach::profile::UserProfile;
use career_coach::session::{ChatMessage, InMemorySnapshotStore, SessionManager};
use career_coach::store::{DataStore, InMemoryStore, ProgressEntry, RetryPolicy};

/// Wraps an `InMemoryStore` and fails on demand.
#[derive(Default)]
struct FaultyStore {
    inner: InMemoryStore,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    /// Transient failures left before loads succeed again.
    transient_loads: AtomicU32,
    load_calls: AtomicU32,
}

impl FaultyStore {
    fn unavailable(operation: &str) -> StoreError {
        StoreError::Unavailable {
            operation: operation.to_string(),
            reason: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl DataStore for FaultyStore {
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Self::unavailable("save_profile"));
        }
        self.inner.save_profile(profile).await
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(Self::unavailable("get_profile"));
        }
        let left = self.transient_loads.load(Ordering::SeqCst);
        if left > 0 {
            self.transient_loads.store(left - 1, Ordering::SeqCst);
            return Err(Self::unavailable("get_profile"));
        }
        self.inner.get_profile(user_id).await
    }

    async fn save_messages(&self, session_id: &str, messages: &[ChatMessage]) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Self::unavailable("save_messages"));
        }
        self.inner.save_messages(session_id, messages).await
    }

    async fn get_messages(&self, session_id: &str, limit: Option<usize>) -> Result<Vec<ChatMessage>, StoreError> {
        self.inner.get_messages(session_id, limit).await
    }

    async fn record_completed_action(&self, user_id: &str, action_id: &str) -> Result<(), StoreError> {
        self.inner.record_completed_action(user_id, action_id).await
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<ProgressEntry>, StoreError> {
        self.inner.list_progress(user_id).await
    }
}

fn test_config() -> CoachConfig {
    CoachConfig {
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
        },
        ..CoachConfig::default()
    }
}

fn setup_with(config: CoachConfig) -> (Orchestrator, Arc<FaultyStore>) {
    let store = Arc::new(FaultyStore::default());
    let sessions = SessionManager::new(config.session, Arc::new(InMemorySnapshotStore::new()));
    let orchestrator = Orchestrator::new(&config, store.clone(), sessions);
    (orchestrator, store)
}

fn setup() -> (Orchestrator, Arc<FaultyStore>) {
    setup_with(test_config())
}

#[tokio::test]
async fn introduction_is_stored_on_the_profile() {
    let (orch, store) = setup();

    let response = orch
        .process_request(CoachRequest::new("u1", "I'm a teacher with 8 years of experience"))
        .await;

    assert_eq!(response.intent.kind, IntentKind::ProfileBuilding);
    assert!(response.content.contains("teacher"), "{}", response.content);
    assert!(is_actionable(&response.content));

    let profile = store.get_profile("u1").await.unwrap().unwrap();
    assert_eq!(profile.personal.current_role.as_deref(), Some("teacher"));
    assert_eq!(profile.personal.years_of_experience, 8);

    let history = store.get_messages(&response.session_id, None).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn mindset_support_comes_before_tactics() {
    let (orch, store) = setup();

    let response = orch
        .process_request(CoachRequest::new(
            "u1",
            "I feel completely overwhelmed and don't know which skills to learn",
        ))
        .await;

    assert_eq!(response.intent.kind, IntentKind::SkillGuidance);
    assert!(
        response.content.starts_with("It sounds like a lot is landing on you"),
        "{}",
        response.content
    );
    let recs = response.recommendations.expect("skill recommendations");
    assert!(recs.skills.is_some());

    // the struggle is remembered as a challenge
    let profile = store.get_profile("u1").await.unwrap().unwrap();
    assert_eq!(profile.career.challenges.len(), 1);
}

#[tokio::test]
async fn every_reply_is_actionable() {
    let (orch, _store) = setup();
    let messages = [
        "hello",
        "What career paths would suit me?",
        "Which skills should I learn?",
        "What should I do next this week?",
        "I want a long-term roadmap to get promoted",
        "I want to switch into data science",
        "How am I doing on my progress?",
        "I keep doubting myself",
        "🙂",
    ];

    let mut session_id: Option<String> = None;
    for message in messages {
        let mut request = CoachRequest::new("u1", message);
        request.session_id = session_id.clone();
        let response = orch.process_request(request).await;
        assert!(is_actionable(&response.content), "{message}: {}", response.content);
        session_id = Some(response.session_id);
    }
}

#[tokio::test]
async fn career_question_returns_ranked_paths() {
    let (orch, _store) = setup();
    let response = orch
        .process_request(CoachRequest::new("u1", "What career options fit me?"))
        .await;

    assert_eq!(response.intent.kind, IntentKind::CareerClarity);
    let paths = response.recommendations.unwrap().career_paths.unwrap();
    assert!(!paths.is_empty() && paths.len() <= 3);
    for pair in paths.windows(2) {
        assert!(pair[0].fit_score >= pair[1].fit_score);
    }
}

#[tokio::test]
async fn transition_request_returns_a_plan() {
    let (orch, _store) = setup();
    let response = orch
        .process_request(CoachRequest::new(
            "u1",
            "I'm a teacher and I want to transition into ux design",
        ))
        .await;

    assert_eq!(response.intent.kind, IntentKind::TransitionGuidance);
    let plan = response.recommendations.unwrap().transition_plan.unwrap();
    assert_eq!(plan.source_field, "teacher");
    assert_eq!(plan.target_field, "ux design");
    assert!(!plan.risks.is_empty());
}

#[tokio::test(start_paused = true)]
async fn profile_load_failure_returns_context_fallback() {
    let (orch, store) = setup();
    store.fail_loads.store(true, Ordering::SeqCst);

    let response = orch
        .process_request(CoachRequest::new("u1", "Which skills should I learn?"))
        .await;

    assert_eq!(response.content, FallbackContext::Skills.message());
    assert!(response.recommendations.is_none());
    assert!(!response.content.to_lowercase().contains("connection"));
    // retried up to the policy limit
    assert_eq!(store.load_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn transient_load_failures_are_retried() {
    let (orch, store) = setup();
    store.transient_loads.store(2, Ordering::SeqCst);

    let response = orch
        .process_request(CoachRequest::new("u1", "What career paths suit me?"))
        .await;

    assert_eq!(store.load_calls.load(Ordering::SeqCst), 3);
    assert!(response.recommendations.is_some());
    assert_ne!(response.content, FallbackContext::CareerPaths.message());
}

#[tokio::test(start_paused = true)]
async fn save_failure_keeps_recommendations() {
    let (orch, store) = setup();
    store.fail_saves.store(true, Ordering::SeqCst);

    let response = orch
        .process_request(CoachRequest::new("u1", "What career paths suit me?"))
        .await;

    assert_eq!(response.content, FallbackContext::CareerPaths.message());
    assert!(response.recommendations.unwrap().career_paths.is_some());
    assert!(store.inner.get_profile("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_users_get_separate_sessions() {
    let (orch, store) = setup();

    let requests = (0..20).map(|i| {
        let orch = &orch;
        async move {
            orch.process_request(CoachRequest::new(format!("user-{}", i % 5), "What career paths suit me?"))
                .await
        }
    });
    let responses = join_all(requests).await;

    let mut ids: Vec<_> = responses.iter().map(|r| r.session_id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    for i in 0..5 {
        assert!(store.get_profile(&format!("user-{i}")).await.unwrap().is_some());
    }
    assert_eq!(orch.sessions().get_stats().await.active, 20);
}

#[tokio::test]
async fn concurrent_requests_in_one_session_are_serialized() {
    let (orch, store) = setup();
    let first = orch.process_request(CoachRequest::new("u1", "hello")).await;
    let session_id = first.session_id.clone();

    let requests = (0..10).map(|i| {
        let orch = &orch;
        let session_id = session_id.clone();
        async move {
            orch.process_request(CoachRequest::new("u1", format!("message {i}")).in_session(session_id))
                .await
        }
    });
    let responses = join_all(requests).await;

    assert!(responses.iter().all(|r| r.session_id == session_id));
    let session = orch.sessions().get_session(&session_id).await.unwrap();
    assert_eq!(session.context.history.len(), 22);
    assert_eq!(store.get_messages(&session_id, None).await.unwrap().len(), 22);
}

#[tokio::test]
async fn ended_session_is_restored_on_next_message() {
    let (orch, _store) = setup();
    let first = orch
        .process_request(CoachRequest::new("u1", "What career paths suit me?"))
        .await;
    orch.end_session(&first.session_id).await.unwrap();
    assert!(orch.sessions().get_session(&first.session_id).await.is_none());

    let second = orch
        .process_request(CoachRequest::new("u1", "Which skills should I learn?").in_session(&first.session_id))
        .await;

    assert_ne!(second.session_id, first.session_id);
    let session = orch.sessions().get_session(&second.session_id).await.unwrap();
    assert_eq!(session.context.history.len(), 4);
    assert!(session.context.active_topics.contains(&"career_clarity".to_string()));
}

#[tokio::test]
async fn another_users_session_is_not_shared() {
    let (orch, _store) = setup();
    let theirs = orch.process_request(CoachRequest::new("u1", "hello")).await;

    let mine = orch
        .process_request(CoachRequest::new("u2", "hello").in_session(&theirs.session_id))
        .await;

    assert_ne!(mine.session_id, theirs.session_id);
    let session = orch.sessions().get_session(&mine.session_id).await.unwrap();
    assert_eq!(session.user_id, "u2");
}

#[tokio::test(start_paused = true)]
async fn idle_session_times_out_and_restores() {
    let config = CoachConfig {
        session: SessionConfig {
            timeout: Duration::from_secs(10),
            warning: Duration::from_secs(8),
        },
        ..test_config()
    };
    let (orch, _store) = setup_with(config);
    let first = orch.process_request(CoachRequest::new("u1", "hello")).await;

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert!(orch.sessions().get_session(&first.session_id).await.is_none());

    let second = orch
        .process_request(CoachRequest::new("u1", "hello again").in_session(&first.session_id))
        .await;
    let session = orch.sessions().get_session(&second.session_id).await.unwrap();
    assert_eq!(session.context.history.len(), 4);
}

#[tokio::test]
async fn completing_an_action_updates_progress() {
    let (orch, store) = setup();
    let response = orch
        .process_request(CoachRequest::new("u1", "What should I do next this week?"))
        .await;
    assert_eq!(response.intent.kind, IntentKind::ActionPlanning);
    let action_id = response.recommendations.unwrap().actions.unwrap()[0].id.clone();

    assert_eq!(orch.complete_action("u1", &action_id).await.unwrap(), 1);
    // idempotent
    assert_eq!(orch.complete_action("u1", &action_id).await.unwrap(), 1);

    let session = orch.sessions().get_session(&response.session_id).await.unwrap();
    let action = session
        .context
        .pending_actions
        .iter()
        .find(|a| a.id == action_id)
        .unwrap();
    assert!(action.completed);

    let profile = store.get_profile("u1").await.unwrap().unwrap();
    assert!(profile.progress.completed_actions.contains(&action_id));
}

#[tokio::test]
async fn completing_for_unknown_user_is_rejected() {
    let (orch, _store) = setup();
    let err = orch.complete_action("nobody", "action-1").await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}
