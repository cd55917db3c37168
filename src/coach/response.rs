//! Request/response types and response assembly.

use serde::{Deserialize, Serialize};

use crate::classify::Intent;
use crate::recommend::Recommendations;

/// Question appended when no section already asks for something.
pub const DEFAULT_FOLLOW_UP: &str = "What would you like to focus on next?";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachRequest {
    pub user_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl CoachRequest {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
            session_id: None,
        }
    }

    /// Builder: continue an existing session.
    pub fn in_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachResponse {
    pub content: String,
    pub session_id: String,
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Recommendations>,
}

/// Whether `text` asks the user something or hands them a next step.
pub fn is_actionable(text: &str) -> bool {
    text.contains('?') || text.contains("Next step")
}

/// Collects response sections in order.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    sections: Vec<String>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if !text.trim().is_empty() {
            self.sections.push(text.trim().to_string());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Join the sections, appending [`DEFAULT_FOLLOW_UP`] if nothing in them
    /// is actionable.
    pub fn finish(mut self) -> String {
        if !self.sections.iter().any(|s| is_actionable(s)) {
            self.sections.push(DEFAULT_FOLLOW_UP.to_string());
        }
        self.sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sympathy_alone_gets_a_follow_up() {
        let mut builder = ResponseBuilder::new();
        builder.section("That sounds hard.");
        let content = builder.finish();
        assert!(content.ends_with(DEFAULT_FOLLOW_UP));
        assert!(is_actionable(&content));
    }

    #[test]
    fn existing_question_is_kept_alone() {
        let mut builder = ResponseBuilder::new();
        builder.section("First part.").section("Which path appeals to you?");
        assert_eq!(builder.finish(), "First part.\n\nWhich path appeals to you?");
    }

    #[test]
    fn blank_sections_are_skipped() {
        let mut builder = ResponseBuilder::new();
        builder.section("  ").section("");
        assert!(builder.is_empty());
        assert_eq!(builder.finish(), DEFAULT_FOLLOW_UP);
    }

    #[test]
    fn request_builder() {
        let req = CoachRequest::new("u1", "hi").in_session("s1");
        assert_eq!(req.session_id.as_deref(), Some("s1"));
        let json = serde_json::to_value(CoachRequest::new("u1", "hi")).unwrap();
        assert!(json.get("session_id").is_none());
    }
}
