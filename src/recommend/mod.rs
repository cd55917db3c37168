//! Career paths, skill plans and action steps derived from a profile.

pub mod catalog;
pub mod engine;
pub mod model;
pub mod ordering;

pub use engine::{RecommendationEngine, time_to_transition};
pub use model::{
    ActionCategory, ActionStep, CareerPath, DifficultyLevel, DurationRange, GrowthPlan, InRoleGrowth,
    Phase, PhaseObjective, Recommendations, SkillRecommendation, Timeframe, TransitionPhase,
    TransitionPlan,
};
