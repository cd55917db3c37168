//! Profile analysis: strengths, gaps, readiness and progress.
//!
//! Pure functions over a profile snapshot. Nothing here touches storage.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{DEFAULT_CHALLENGE, RuleTable, challenge_rules, struggle_cue};
use crate::recommend::CareerPath;

use super::model::{ChallengeType, Goal, GoalType, Priority, UserProfile};

/// Level at which a skill counts as a strength / is considered mastered.
pub const STRONG_SKILL_LEVEL: u8 = 7;
/// Level below which a skill counts as a weakness.
pub const WEAK_SKILL_LEVEL: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerStage {
    Early,
    Mid,
    Transition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub career_stage: CareerStage,
}

/// Distance between where a skill is and where a path needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub current_level: u8,
    pub target_level: u8,
    pub priority: Priority,
    pub estimated_time: String,
}

impl SkillGap {
    pub fn severity(&self) -> u8 {
        self.target_level.saturating_sub(self.current_level)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessAssessment {
    /// 0.0 to 1.0.
    pub score: f64,
    pub skill_alignment: f64,
    pub blockers: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Inclusive reporting window for progress tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportingWindow {
    /// The `days` days leading up to now.
    pub fn last_days(days: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// All-time.
    pub completed_actions: usize,
    pub milestones_completed: usize,
    pub total_milestones: usize,
    pub skills_mastered: usize,
    pub goals_due: usize,
    /// Milestones completed in the window over all milestones.
    pub overall_progress: f64,
}

/// A profile field required before coaching can be fully personalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    CurrentRole,
    Education,
    Goals,
    Interests,
    Struggles,
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CurrentRole => "current_role",
            Self::Education => "education",
            Self::Goals => "goals",
            Self::Interests => "interests",
            Self::Struggles => "struggles",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    pub is_complete: bool,
    pub missing_fields: Vec<ProfileField>,
}

/// Stateless profile analyzer. Holds the compiled challenge rules.
pub struct ProfileAnalyzer {
    challenge_rules: RuleTable<ChallengeType>,
    struggle_cue: Regex,
}

impl ProfileAnalyzer {
    pub fn new() -> Self {
        Self {
            challenge_rules: challenge_rules(),
            struggle_cue: struggle_cue(),
        }
    }

    /// Whether `text` describes a struggle worth recording as a challenge.
    pub fn describes_struggle(&self, text: &str) -> bool {
        self.struggle_cue.is_match(text)
    }

    /// Derive strengths, weaknesses and career stage.
    pub fn analyze_profile(&self, profile: &UserProfile) -> ProfileAnalysis {
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();

        for skill in &profile.skills.current {
            if skill.level >= STRONG_SKILL_LEVEL {
                strengths.push(format!("Strong {} ({}/10)", skill.name, skill.level));
            } else if skill.level < WEAK_SKILL_LEVEL {
                weaknesses.push(format!("Developing {} ({}/10)", skill.name, skill.level));
            }
        }

        if profile.mindset.confidence_level >= 0.7 {
            strengths.push("High confidence".to_string());
        } else if profile.mindset.confidence_level < 0.5 {
            weaknesses.push("Low confidence".to_string());
        }

        if profile.personal.years_of_experience >= 5 {
            strengths.push(format!(
                "{} years of professional experience",
                profile.personal.years_of_experience
            ));
        }

        weaknesses.extend(profile.career.challenges.iter().map(|c| c.description.clone()));

        ProfileAnalysis {
            strengths,
            weaknesses,
            career_stage: self.career_stage(profile),
        }
    }

    pub fn career_stage(&self, profile: &UserProfile) -> CareerStage {
        if profile.has_challenge(ChallengeType::Transition) {
            CareerStage::Transition
        } else if profile.personal.years_of_experience < 3 {
            CareerStage::Early
        } else {
            CareerStage::Mid
        }
    }

    /// Map a free-text struggle to a challenge category. Never fails.
    pub fn categorize_challenge(&self, description: &str) -> ChallengeType {
        self.challenge_rules.classify_or(description, DEFAULT_CHALLENGE)
    }

    /// Gaps between the profile's current skills and what `target` requires,
    /// in `required_skills` order.
    pub fn identify_gaps(&self, profile: &UserProfile, target: &CareerPath) -> Vec<SkillGap> {
        target
            .required_skills
            .iter()
            .filter_map(|required| match profile.skill_level(required) {
                None => Some(SkillGap {
                    skill: required.clone(),
                    current_level: 0,
                    target_level: STRONG_SKILL_LEVEL,
                    priority: Priority::High,
                    estimated_time: "3-6 months".to_string(),
                }),
                Some(level) if level < STRONG_SKILL_LEVEL => Some(SkillGap {
                    skill: required.clone(),
                    current_level: level,
                    target_level: STRONG_SKILL_LEVEL,
                    priority: if level < WEAK_SKILL_LEVEL {
                        Priority::High
                    } else {
                        Priority::Medium
                    },
                    estimated_time: estimate_for_delta(STRONG_SKILL_LEVEL - level).to_string(),
                }),
                Some(_) => None,
            })
            .collect()
    }

    /// Score how ready the user is to pursue `goal`.
    pub fn assess_readiness(&self, profile: &UserProfile, goal: &Goal) -> ReadinessAssessment {
        let target_count = profile.skills.target.len();
        let skill_alignment = if target_count == 0 {
            1.0
        } else {
            (profile.skills.current.len() as f64 / target_count as f64).min(1.0)
        };
        let experience = (profile.personal.years_of_experience as f64 / 10.0).min(1.0);
        let motivation = profile.mindset.motivation_level;

        let score = 0.4 * skill_alignment + 0.3 * experience + 0.3 * motivation;

        let mut blockers = Vec::new();
        let mut recommendations = Vec::new();

        if skill_alignment < 0.5 {
            blockers.push("skill gaps".to_string());
            recommendations.push(format!(
                "Build foundational skills before pushing on \"{}\"",
                goal.description
            ));
        }
        if motivation < 0.5 {
            blockers.push("low motivation".to_string());
            recommendations.push("Reconnect with why this goal matters to you".to_string());
        }
        if profile.personal.years_of_experience < 2 && goal.goal_type == GoalType::LongTerm {
            recommendations.push(format!(
                "Break \"{}\" into smaller milestones you can reach in a few months",
                goal.description
            ));
        }

        ReadinessAssessment {
            score,
            skill_alignment,
            blockers,
            recommendations,
        }
    }

    /// Summarize progress within `window`.
    pub fn track_progress(&self, profile: &UserProfile, window: &ReportingWindow) -> ProgressReport {
        let milestones = &profile.progress.milestones;
        let milestones_completed = milestones
            .iter()
            .filter(|m| m.completed && m.completed_date.is_some_and(|d| window.contains(d)))
            .count();
        let overall_progress = if milestones.is_empty() {
            0.0
        } else {
            milestones_completed as f64 / milestones.len() as f64
        };

        ProgressReport {
            completed_actions: profile.progress.completed_actions.len(),
            milestones_completed,
            total_milestones: milestones.len(),
            skills_mastered: profile
                .skills
                .current
                .iter()
                .filter(|s| s.level >= STRONG_SKILL_LEVEL)
                .count(),
            goals_due: profile
                .career
                .goals
                .iter()
                .filter(|g| g.target_date.is_some_and(|d| d <= window.end))
                .count(),
            overall_progress,
        }
    }

    /// Which of the required profile fields are missing.
    pub fn check_profile_completeness(&self, profile: &UserProfile) -> Completeness {
        let mut missing_fields = Vec::new();
        if is_blank(profile.personal.current_role.as_deref()) {
            missing_fields.push(ProfileField::CurrentRole);
        }
        if is_blank(profile.personal.education.as_deref()) {
            missing_fields.push(ProfileField::Education);
        }
        if profile.career.goals.is_empty() {
            missing_fields.push(ProfileField::Goals);
        }
        if profile.career.interests.is_empty() {
            missing_fields.push(ProfileField::Interests);
        }
        if profile.career.challenges.is_empty() {
            missing_fields.push(ProfileField::Struggles);
        }

        Completeness {
            is_complete: missing_fields.is_empty(),
            missing_fields,
        }
    }
}

impl Default for ProfileAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn estimate_for_delta(delta: u8) -> &'static str {
    match delta {
        0..=2 => "1-2 months",
        3..=4 => "3-4 months",
        5..=6 => "5-6 months",
        _ => "6+ months",
    }
}
