//! Session and conversation context types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{Intent, IntentKind};
use crate::recommend::ActionStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Coach,
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Intent the coach answered with; `None` on user turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentKind>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            intent: None,
        }
    }

    pub fn coach(content: impl Into<String>, intent: IntentKind) -> Self {
        Self {
            role: Role::Coach,
            content: content.into(),
            timestamp: Utc::now(),
            intent: Some(intent),
        }
    }
}

/// Conversation state carried across requests in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Oldest first.
    pub history: Vec<ChatMessage>,
    pub current_intent: Intent,
    pub active_topics: Vec<String>,
    pub pending_actions: Vec<ActionStep>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            current_intent: Intent::new(IntentKind::ProfileBuilding, 1.0),
            active_topics: Vec::new(),
            pending_actions: Vec::new(),
        }
    }

    /// Drop the oldest messages beyond `limit`.
    pub fn trim_history(&mut self, limit: usize) {
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    /// Add a topic tag unless already present.
    pub fn add_topic(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        if !self.active_topics.contains(&topic) {
            self.active_topics.push(topic);
        }
    }

    /// Mark a pending action completed. Returns whether one matched.
    pub fn complete_action(&mut self, action_id: &str) -> bool {
        match self.pending_actions.iter_mut().find(|a| a.id == action_id) {
            Some(action) => {
                action.completed = true;
                true
            }
            None => false,
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub context: SessionContext,
}

impl Session {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, context: SessionContext) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            started_at: now,
            last_activity: now,
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::{ActionCategory, Timeframe};

    #[test]
    fn new_context_starts_in_profile_building() {
        let ctx = SessionContext::new();
        assert!(ctx.history.is_empty());
        assert_eq!(ctx.current_intent.kind, IntentKind::ProfileBuilding);
        assert_eq!(ctx.current_intent.confidence, 1.0);
        assert!(ctx.active_topics.is_empty());
        assert!(ctx.pending_actions.is_empty());
    }

    #[test]
    fn trim_keeps_most_recent() {
        let mut ctx = SessionContext::new();
        for i in 0..5 {
            ctx.history.push(ChatMessage::user(format!("m{i}")));
        }
        ctx.trim_history(2);
        let contents: Vec<_> = ctx.history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4"]);

        ctx.trim_history(10);
        assert_eq!(ctx.history.len(), 2);
    }

    #[test]
    fn topics_are_deduplicated() {
        let mut ctx = SessionContext::new();
        ctx.add_topic("skills");
        ctx.add_topic("skills");
        ctx.add_topic("mindset");
        assert_eq!(ctx.active_topics, vec!["skills", "mindset"]);
    }

    #[test]
    fn complete_pending_action() {
        let mut ctx = SessionContext::new();
        let step = ActionStep::new("Update resume", Timeframe::ThisWeek, ActionCategory::Application);
        let id = step.id.clone();
        ctx.pending_actions.push(step);

        assert!(ctx.complete_action(&id));
        assert!(ctx.pending_actions[0].completed);
        assert!(!ctx.complete_action("missing"));
    }

    #[test]
    fn message_roles_serialize_lowercase() {
        let msg = ChatMessage::coach("hi", IntentKind::CareerClarity);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "coach");
        assert_eq!(json["intent"], "career_clarity");
        let user = serde_json::to_value(ChatMessage::user("hey")).unwrap();
        assert!(user.get("intent").is_none());
    }
}
