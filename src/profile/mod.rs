//! User profiles and the analysis run over them.

pub mod analyzer;
pub mod model;

pub use analyzer::{
    CareerStage, Completeness, ProfileAnalysis, ProfileAnalyzer, ProfileField, ProgressReport,
    ReadinessAssessment, ReportingWindow, SkillGap,
};
pub use model::{
    CareerInfo, Challenge, ChallengeType, Goal, GoalType, Milestone, Mindset, PersonalInfo,
    Priority, Progress, Skill, SkillSet, UserProfile,
};
