//! User profile data model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Highest skill level / challenge severity.
pub const MAX_LEVEL: u8 = 10;

/// Relative importance, shared by goals, gaps and recommendations.
///
/// Declared low-to-high so `Ord` sorts `High` last; use `Reverse` or
/// `cmp().reverse()` for most-important-first ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    ShortTerm,
    LongTerm,
}

/// A career goal stated by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub description: String,
    pub goal_type: GoalType,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn new(id: impl Into<String>, description: impl Into<String>, goal_type: GoalType) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            goal_type,
            priority: Priority::Medium,
            target_date: None,
        }
    }

    /// Builder: set priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: set target date.
    pub fn with_target_date(mut self, date: DateTime<Utc>) -> Self {
        self.target_date = Some(date);
        self
    }
}

/// The six struggle categories a challenge can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
    Direction,
    Skills,
    Confidence,
    Overwhelm,
    Transition,
    Stagnation,
}

impl ChallengeType {
    pub const ALL: [ChallengeType; 6] = [
        Self::Direction,
        Self::Skills,
        Self::Confidence,
        Self::Overwhelm,
        Self::Transition,
        Self::Stagnation,
    ];
}

impl std::fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Direction => "direction",
            Self::Skills => "skills",
            Self::Confidence => "confidence",
            Self::Overwhelm => "overwhelm",
            Self::Transition => "transition",
            Self::Stagnation => "stagnation",
        };
        write!(f, "{s}")
    }
}

/// A categorized career struggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub challenge_type: ChallengeType,
    pub description: String,
    /// 0 (minor) to 10 (blocking).
    pub severity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// 0 (none) to 10 (expert).
    pub level: u8,
    pub category: String,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: u8, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_date: DateTime<Utc>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    pub years_of_experience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_path: Option<String>,
    pub goals: Vec<Goal>,
    pub interests: Vec<String>,
    pub challenges: Vec<Challenge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    pub current: Vec<Skill>,
    pub learning: Vec<Skill>,
    pub target: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mindset {
    /// 0.0 to 1.0.
    pub confidence_level: f64,
    /// 0.0 to 1.0.
    pub motivation_level: f64,
    pub concerns: Vec<String>,
}

impl Default for Mindset {
    fn default() -> Self {
        Self {
            confidence_level: 0.5,
            motivation_level: 0.5,
            concerns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub completed_actions: BTreeSet<String>,
    pub milestones: Vec<Milestone>,
    pub last_updated: DateTime<Utc>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            completed_actions: BTreeSet::new(),
            milestones: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

/// Everything the coach knows about a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub personal: PersonalInfo,
    pub career: CareerInfo,
    pub skills: SkillSet,
    pub mindset: Mindset,
    pub progress: Progress,
}

impl UserProfile {
    /// A minimal profile with nothing but an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            personal: PersonalInfo::default(),
            career: CareerInfo::default(),
            skills: SkillSet::default(),
            mindset: Mindset::default(),
            progress: Progress::default(),
        }
    }

    /// Level of a current skill, matched case-insensitively.
    pub fn skill_level(&self, name: &str) -> Option<u8> {
        self.skills
            .current
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.level)
    }

    /// Whether the user has or is learning a skill.
    pub fn knows_of(&self, name: &str) -> bool {
        self.skills
            .current
            .iter()
            .chain(self.skills.learning.iter())
            .any(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn has_challenge(&self, challenge_type: ChallengeType) -> bool {
        self.career
            .challenges
            .iter()
            .any(|c| c.challenge_type == challenge_type)
    }

    /// Range-check every bounded field. Called before any write.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "id".to_string(),
            });
        }

        let skill_lists = [
            ("skills.current", &self.skills.current),
            ("skills.learning", &self.skills.learning),
            ("skills.target", &self.skills.target),
        ];
        for (list, skills) in skill_lists {
            for skill in skills {
                if skill.level > MAX_LEVEL {
                    return Err(out_of_range(
                        format!("{list}[{}].level", skill.name),
                        skill.level as f64,
                        0.0,
                        MAX_LEVEL as f64,
                    ));
                }
            }
        }

        for (i, challenge) in self.career.challenges.iter().enumerate() {
            if challenge.severity > MAX_LEVEL {
                return Err(out_of_range(
                    format!("career.challenges[{i}].severity"),
                    challenge.severity as f64,
                    0.0,
                    MAX_LEVEL as f64,
                ));
            }
        }

        check_unit("mindset.confidence_level", self.mindset.confidence_level)?;
        check_unit("mindset.motivation_level", self.mindset.motivation_level)?;

        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(field.to_string(), value, 0.0, 1.0))
    }
}

fn out_of_range(field: String, value: f64, min: f64, max: f64) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        value,
        min,
        max,
    }
}
