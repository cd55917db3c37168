//! Coaching orchestrator: routes each message through classification,
//! analysis and recommendation, and assembles the reply.
//!
//! Requests on the same session id are serialized with a per-session async
//! mutex; different sessions run concurrently. A lock entry lives only while
//! some request holds or waits on it. Store failures never reach the caller:
//! they are logged and replaced with a fallback reply.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::classify::entities::{CURRENT_ROLE, INTERESTS, SKILLS, TARGET_FIELD, YEARS_OF_EXPERIENCE};
use crate::classify::{Classification, Intent, IntentClassifier, IntentKind, entity_list};
use crate::config::CoachConfig;
use crate::error::{SessionError, StoreError};
use crate::profile::model::MAX_LEVEL;
use crate::profile::{
    CareerStage, Challenge, Goal, GoalType, Priority, ProfileAnalyzer, ReportingWindow, Skill,
    UserProfile,
};
use crate::recommend::catalog;
use crate::recommend::{CareerPath, RecommendationEngine, Recommendations, Timeframe};
use crate::session::{ChatMessage, SessionManager};
use crate::store::{DataStore, RetryingStore};

use super::compose;
use super::fallback::FallbackContext;
use super::response::{CoachRequest, CoachResponse, ResponseBuilder};

/// Days of history a progress check reports on.
const PROGRESS_WINDOW_DAYS: i64 = 30;

type LockMap = std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>;

/// A claim on one session's request lock. Dropping the last claim removes
/// the entry from the map.
struct SessionLease<'a> {
    locks: &'a LockMap,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl<'a> SessionLease<'a> {
    fn acquire(locks: &'a LockMap, key: &str) -> Self {
        let lock = locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .clone();
        Self {
            locks,
            key: key.to_string(),
            lock,
        }
    }
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // one reference in the map, one here: nobody else is waiting
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}

pub struct Orchestrator {
    store: Arc<dyn DataStore>,
    sessions: SessionManager,
    classifier: IntentClassifier,
    engine: RecommendationEngine,
    history_limit: usize,
    locks: LockMap,
}

impl Orchestrator {
    /// Every store call made by the orchestrator goes through the config's
    /// retry policy.
    pub fn new(config: &CoachConfig, store: Arc<dyn DataStore>, sessions: SessionManager) -> Self {
        Self {
            store: Arc::new(RetryingStore::new(store, config.retry)),
            sessions,
            classifier: IntentClassifier::new(),
            engine: RecommendationEngine::new(),
            history_limit: config.history_limit,
            locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    fn analyzer(&self) -> &ProfileAnalyzer {
        self.engine.analyzer()
    }

    /// Handle one user message. Always returns a well-formed response.
    pub async fn process_request(&self, request: CoachRequest) -> CoachResponse {
        let lock_key = request
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let lease = SessionLease::acquire(&self.locks, &lock_key);
        let _guard = lease.lock.lock().await;

        let session_id = match self.resolve_session(&request, &lock_key).await {
            Ok(id) => id,
            Err(e) => {
                warn!(user_id = %request.user_id, session_id = %lock_key, error = %e, "Could not open session");
                let intent = self.classifier.classify(&request.message, IntentKind::ProfileBuilding).intent;
                return fallback(lock_key, intent, FallbackContext::Default);
            }
        };

        let mut profile = match self.store.get_profile(&request.user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                debug!(user_id = %request.user_id, "No stored profile, starting fresh");
                UserProfile::new(&request.user_id)
            }
            Err(e) => {
                warn!(user_id = %request.user_id, error = %e, "Failed to load profile");
                let intent = self.classifier.classify(&request.message, IntentKind::ProfileBuilding).intent;
                let context = FallbackContext::for_intent(intent.kind);
                return fallback(session_id, intent, context);
            }
        };

        let completeness = self.analyzer().check_profile_completeness(&profile);
        let fallback_kind = if completeness.is_complete {
            IntentKind::CareerClarity
        } else {
            IntentKind::ProfileBuilding
        };
        let classification = self.classifier.classify(&request.message, fallback_kind);
        let intent = classification.intent.clone();
        info!(
            session_id = %session_id,
            intent = %intent.kind,
            confidence = intent.confidence,
            emotions = classification.emotions.len(),
            "Classified message"
        );

        let noted = self.enrich_profile(&mut profile, &classification, &request.message);
        if let Err(e) = profile.validate() {
            warn!(user_id = %request.user_id, error = %e, "Profile failed validation");
            return fallback(session_id, intent, FallbackContext::ProfileAnalysis);
        }

        let (content, recommendations) = self
            .compose(&session_id, &profile, &classification, &request.message, &noted)
            .await;

        let history = self
            .sessions
            .update_context(&session_id, |ctx| {
                ctx.current_intent = intent.clone();
                ctx.add_topic(intent.kind.to_string());
                ctx.history.push(ChatMessage::user(&request.message));
                ctx.history.push(ChatMessage::coach(&content, intent.kind));
                if let Some(actions) = recommendations.as_ref().and_then(|r| r.actions.as_ref()) {
                    ctx.pending_actions = actions.clone();
                }
                ctx.trim_history(self.history_limit);
                ctx.history.clone()
            })
            .await
            .unwrap_or_else(|e| {
                warn!(session_id = %session_id, error = %e, "Session ended while handling request");
                Vec::new()
            });

        if let Err(e) = self.persist(&profile, &session_id, &history).await {
            warn!(user_id = %request.user_id, session_id = %session_id, error = %e, "Failed to persist coaching state");
            return CoachResponse {
                content: FallbackContext::for_intent(intent.kind).message().to_string(),
                session_id,
                intent,
                recommendations,
            };
        }

        CoachResponse {
            content,
            session_id,
            intent,
            recommendations,
        }
    }

    /// End a session, preserving its context for later restoration.
    pub async fn end_session(&self, session_id: &str) -> Result<(), SessionError> {
        let lease = SessionLease::acquire(&self.locks, session_id);
        let _guard = lease.lock.lock().await;
        self.sessions.end_session(session_id).await
    }

    /// Record a completed action and mark it done in the user's live
    /// sessions. Returns the length of the user's progress log.
    pub async fn complete_action(&self, user_id: &str, action_id: &str) -> Result<usize, StoreError> {
        self.store.record_completed_action(user_id, action_id).await?;

        for session in self.sessions.get_user_sessions(user_id).await {
            // the session may have expired since it was listed
            let _ = self
                .sessions
                .update_context(&session.id, |ctx| ctx.complete_action(action_id))
                .await;
        }

        let progress = self.store.list_progress(user_id).await?;
        info!(user_id, action_id, total = progress.len(), "Action completed");
        Ok(progress.len())
    }

    /// Reuse a live session, restore a preserved one, or start a new one.
    async fn resolve_session(&self, request: &CoachRequest, lock_key: &str) -> Result<String, SessionError> {
        let user_id = &request.user_id;
        let Some(requested) = request.session_id.as_deref() else {
            self.sessions.create_session(user_id, lock_key).await?;
            return Ok(lock_key.to_string());
        };

        // ownership check and timer reset happen under one lock, so a timer
        // firing in between lands in the restore branch
        match self.sessions.touch(requested, user_id).await {
            Ok(true) => return Ok(requested.to_string()),
            Ok(false) => {
                warn!(user_id = %user_id, session_id = requested, "Session belongs to another user");
            }
            Err(SessionError::Timeout { .. }) => {
                let new_id = Uuid::new_v4().to_string();
                if self.sessions.restore_session(user_id, requested, &new_id).await?.is_some() {
                    return Ok(new_id);
                }
            }
            Err(e) => return Err(e),
        }

        let new_id = Uuid::new_v4().to_string();
        self.sessions.create_session(user_id, &new_id).await?;
        Ok(new_id)
    }

    async fn persist(&self, profile: &UserProfile, session_id: &str, history: &[ChatMessage]) -> Result<(), StoreError> {
        self.store.save_profile(profile).await?;
        if !history.is_empty() {
            self.store.save_messages(session_id, history).await?;
        }
        Ok(())
    }

    /// Merge extracted entities and any described struggle into the profile.
    /// Returns short descriptions of what was learned.
    fn enrich_profile(&self, profile: &mut UserProfile, classification: &Classification, message: &str) -> Vec<String> {
        let entities = &classification.intent.entities;
        let mut noted = Vec::new();

        if let Some(role) = entities.get(CURRENT_ROLE) {
            profile.personal.current_role = Some(role.clone());
            noted.push(format!("your role ({role})"));
        }
        if let Some(years) = entities.get(YEARS_OF_EXPERIENCE).and_then(|y| y.parse::<u32>().ok()) {
            profile.personal.years_of_experience = years;
            noted.push(format!("{years} years of experience"));
        }
        for interest in entity_list(entities, INTERESTS) {
            if !profile
                .career
                .interests
                .iter()
                .any(|i| i.eq_ignore_ascii_case(&interest))
            {
                noted.push(format!("your interest in {interest}"));
                profile.career.interests.push(interest);
            }
        }
        for name in entity_list(entities, SKILLS) {
            if !profile.knows_of(&name) {
                let category = catalog::skill_info(&name).map_or("general", |s| s.category);
                profile.skills.learning.push(Skill::new(&name, 1, category));
                noted.push(name);
            }
        }
        if let Some(field) = entities.get(TARGET_FIELD) {
            let description = format!("Move into {field}");
            if !profile.career.goals.iter().any(|g| g.description == description) {
                profile.career.goals.push(
                    Goal::new(format!("goal-{}", Uuid::new_v4()), description, GoalType::LongTerm)
                        .with_priority(Priority::High),
                );
                noted.push(format!("your goal of moving into {field}"));
            }
        }

        let analyzer = self.analyzer();
        if classification.has_emotional_struggle() || analyzer.describes_struggle(message) {
            let description = message.trim().chars().take(280).collect::<String>();
            if !profile.career.challenges.iter().any(|c| c.description == description) {
                let challenge_type = analyzer.categorize_challenge(message);
                let severity = (5 + classification.emotions.len()).min(MAX_LEVEL as usize) as u8;
                debug!(user_id = %profile.id, %challenge_type, severity, "Recorded challenge");
                profile.career.challenges.push(Challenge {
                    challenge_type,
                    description,
                    severity,
                });
            }
        }

        if !noted.is_empty() {
            profile.progress.last_updated = chrono::Utc::now();
        }
        noted
    }

    /// Build the reply text and structured payload for a classified message.
    async fn compose(
        &self,
        session_id: &str,
        profile: &UserProfile,
        classification: &Classification,
        message: &str,
        noted: &[String],
    ) -> (String, Option<Recommendations>) {
        let intent = &classification.intent;
        let mut builder = ResponseBuilder::new();
        let mut recs = Recommendations::default();

        // mindset before tactics
        if classification.has_emotional_struggle() || intent.kind == IntentKind::MindsetSupport {
            builder.section(compose::mindset(&classification.emotions, profile));
        }

        match intent.kind {
            IntentKind::ProfileBuilding => {
                let completeness = self.analyzer().check_profile_completeness(profile);
                builder.section(compose::profile_building(profile, &completeness, noted));
            }
            IntentKind::CareerClarity => {
                let paths = self.engine.generate_career_paths(profile);
                builder.section(compose::career_paths(&paths));
                recs.career_paths = Some(paths);
            }
            IntentKind::SkillGuidance => {
                let path = self.target_path(profile, intent);
                let skills = self.engine.recommend_skills(profile, &path);
                builder.section(compose::skills(&path, &skills));
                recs.skills = Some(skills);
            }
            IntentKind::ActionPlanning => {
                let steps = self
                    .engine
                    .create_action_steps(&profile.career.goals, horizon_from(message));
                builder.section(compose::actions(&steps));
                recs.actions = Some(steps);
            }
            IntentKind::MindsetSupport => {
                let steps = self.engine.create_action_steps(&[], Timeframe::Today);
                recs.actions = Some(steps);
            }
            IntentKind::GrowthPlanning => {
                let path = self.target_path(profile, intent);
                let plan = self.engine.build_growth_plan(profile, &path);
                let stays_in_role = profile.personal.current_role.is_some()
                    && !intent.entities.contains_key(TARGET_FIELD)
                    && self.analyzer().career_stage(profile) != CareerStage::Transition;
                let in_role = stays_in_role.then(|| self.engine.suggest_in_role_growth(profile));
                builder.section(compose::growth(&plan, in_role.as_ref()));
                recs.growth_plan = Some(plan);
                recs.in_role_growth = in_role;
            }
            IntentKind::TransitionGuidance => {
                let source = profile
                    .personal
                    .current_role
                    .clone()
                    .or_else(|| profile.personal.industry.clone())
                    .unwrap_or_else(|| "your current field".to_string());
                let target = match intent.entities.get(TARGET_FIELD) {
                    Some(field) => field.clone(),
                    None => self.engine.generate_career_paths(profile)[0].title.to_lowercase(),
                };
                let plan = self.engine.provide_transition_guidance(&source, &target, profile);
                builder.section(compose::transition(&plan));
                recs.transition_plan = Some(plan);
            }
            IntentKind::ProgressCheck => {
                let report = self
                    .analyzer()
                    .track_progress(profile, &ReportingWindow::last_days(PROGRESS_WINDOW_DAYS));
                let open: Vec<_> = self
                    .sessions
                    .get_session(session_id)
                    .await
                    .map(|s| s.context.pending_actions.into_iter().filter(|a| !a.completed).collect())
                    .unwrap_or_default();
                builder.section(compose::progress(&report, &open));
            }
        }

        let recommendations = (!recs.is_empty()).then_some(recs);
        (builder.finish(), recommendations)
    }

    /// The path a request is about: the named target field if the catalog
    /// knows it, otherwise the best-fitting path.
    fn target_path(&self, profile: &UserProfile, intent: &Intent) -> CareerPath {
        intent
            .entities
            .get(TARGET_FIELD)
            .and_then(|field| self.engine.career_path_for_field(field, profile))
            .unwrap_or_else(|| self.engine.generate_career_paths(profile).remove(0))
    }
}

fn fallback(session_id: String, intent: Intent, context: FallbackContext) -> CoachResponse {
    CoachResponse {
        content: context.message().to_string(),
        session_id,
        intent,
        recommendations: None,
    }
}

/// How far out action steps may reach, from cues in the message.
pub fn horizon_from(text: &str) -> Timeframe {
    let text = text.to_lowercase();
    if text.contains("today") {
        Timeframe::Today
    } else if text.contains("this month") {
        Timeframe::ThisMonth
    } else {
        Timeframe::ThisWeek
    }
}
