//! Guidance artifacts produced by the recommendation engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::{Milestone, Priority};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPath {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Why this path fits the profile. Never empty.
    pub reasoning: String,
    /// 0.0 to 1.0.
    pub fit_score: f64,
    pub required_skills: Vec<String>,
    pub time_to_transition: String,
    pub growth_potential: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecommendation {
    pub skill: String,
    pub priority: Priority,
    pub reasoning: String,
    pub learning_resources: Vec<String>,
    pub estimated_time: String,
    /// Recommended skills that must come earlier in the list.
    pub dependencies: Vec<String>,
}

/// When an action step should be done. Ordered nearest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Today,
    ThisWeek,
    ThisMonth,
}

impl Timeframe {
    pub fn due_in(self) -> Duration {
        match self {
            Self::Today => Duration::days(1),
            Self::ThisWeek => Duration::days(7),
            Self::ThisMonth => Duration::days(30),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Today => "today",
            Self::ThisWeek => "this week",
            Self::ThisMonth => "this month",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Learning,
    Networking,
    Application,
    Reflection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    pub id: String,
    pub description: String,
    pub timeframe: Timeframe,
    pub category: ActionCategory,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// The growth-plan objective this step serves, when it belongs to a plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_id: Option<String>,
}

impl ActionStep {
    pub fn new(description: impl Into<String>, timeframe: Timeframe, category: ActionCategory) -> Self {
        Self {
            id: format!("action-{}", uuid::Uuid::new_v4()),
            description: description.into(),
            timeframe,
            category,
            completed: false,
            due_date: Some(Utc::now() + timeframe.due_in()),
            objective_id: None,
        }
    }
}

/// Ties a phase to the career path the plan works toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseObjective {
    pub id: String,
    pub description: String,
    pub career_path_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub description: String,
    pub duration_months: u32,
    pub objectives: Vec<PhaseObjective>,
    pub actions: Vec<ActionStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPlan {
    pub id: String,
    pub user_id: String,
    pub career_path: CareerPath,
    pub timeline_months: u32,
    pub phases: Vec<Phase>,
    pub milestones: Vec<Milestone>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl GrowthPlan {
    pub fn objectives(&self) -> impl Iterator<Item = &PhaseObjective> {
        self.phases.iter().flat_map(|p| p.objectives.iter())
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionStep> {
        self.phases.iter().flat_map(|p| p.actions.iter())
    }
}

/// Ordered easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    Moderate,
    Challenging,
}

impl DifficultyLevel {
    pub fn estimated_duration(self) -> DurationRange {
        let (min_months, max_months) = match self {
            Self::Easy => (3, 6),
            Self::Moderate => (6, 12),
            Self::Challenging => (12, 18),
        };
        DurationRange { min_months, max_months }
    }

    /// How many transition phases a plan at this difficulty gets.
    pub fn phase_count(self) -> usize {
        match self {
            Self::Easy => 2,
            Self::Moderate => 3,
            Self::Challenging => 4,
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Challenging => "challenging",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_months: u32,
    pub max_months: u32,
}

impl std::fmt::Display for DurationRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{} months", self.min_months, self.max_months)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPhase {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPlan {
    pub source_field: String,
    pub target_field: String,
    pub transferable_skills: Vec<String>,
    pub skills_to_acquire: Vec<String>,
    pub phases: Vec<TransitionPhase>,
    pub estimated_duration: DurationRange,
    pub difficulty_level: DifficultyLevel,
    pub risks: Vec<String>,
    pub success_factors: Vec<String>,
}

/// Growth suggestions for someone staying in their current role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InRoleGrowth {
    pub current_role: String,
    pub focus_areas: Vec<String>,
    pub next_steps: Vec<ActionStep>,
}

/// Structured payload attached to a coaching response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_paths: Option<Vec<CareerPath>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillRecommendation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_plan: Option<GrowthPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_plan: Option<TransitionPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_role_growth: Option<InRoleGrowth>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.career_paths.is_none()
            && self.skills.is_none()
            && self.actions.is_none()
            && self.growth_plan.is_none()
            && self.transition_plan.is_none()
            && self.in_role_growth.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_grows_with_difficulty() {
        let levels = [DifficultyLevel::Easy, DifficultyLevel::Moderate, DifficultyLevel::Challenging];
        for pair in levels.windows(2) {
            let (a, b) = (pair[0].estimated_duration(), pair[1].estimated_duration());
            assert!(a.min_months <= b.min_months);
            assert!(a.max_months <= b.max_months);
            assert!(pair[0].phase_count() <= pair[1].phase_count());
        }
        assert_eq!(DifficultyLevel::Moderate.estimated_duration().to_string(), "6-12 months");
    }

    #[test]
    fn timeframes_order_nearest_first() {
        assert!(Timeframe::Today < Timeframe::ThisWeek);
        assert!(Timeframe::ThisWeek < Timeframe::ThisMonth);
        assert!(Timeframe::Today.due_in() < Timeframe::ThisMonth.due_in());
    }

    #[test]
    fn new_action_step_is_open_and_due() {
        let step = ActionStep::new("Update your resume", Timeframe::ThisWeek, ActionCategory::Application);
        assert!(!step.completed);
        assert!(step.id.starts_with("action-"));
        assert!(step.due_date.is_some_and(|d| d > Utc::now()));
        assert!(step.objective_id.is_none());
    }

    #[test]
    fn empty_recommendations_skip_all_fields() {
        let recs = Recommendations::default();
        assert!(recs.is_empty());
        assert_eq!(serde_json::to_string(&recs).unwrap(), "{}");
    }
}
