//! Recommendation engine: career paths, skills, action steps, growth and
//! transition plans.
//!
//! Everything is derived from the profile and the built-in catalog; the
//! engine holds no per-user state and is safe to share across requests.

use std::cmp::Reverse;

use chrono::{DateTime, Months, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::profile::{
    Goal, GoalType, Milestone, ProfileAnalyzer, SkillGap, UserProfile, analyzer::STRONG_SKILL_LEVEL,
};

use super::catalog::{self, CareerTemplate, TRANSFERABLE_SKILLS, contains_phrase};
use super::model::{
    ActionCategory, ActionStep, CareerPath, DifficultyLevel, GrowthPlan, InRoleGrowth, Phase,
    PhaseObjective, SkillRecommendation, Timeframe, TransitionPhase, TransitionPlan,
};
use super::ordering::order_by_dependencies;

/// Paths scoring below this are not suggested.
pub const MIN_FIT_SCORE: f64 = 0.3;
pub const MAX_CAREER_PATHS: usize = 3;
pub const MAX_ACTION_STEPS: usize = 6;

/// Growth plans never run shorter or longer than this.
pub const MIN_PLAN_MONTHS: u32 = 3;
pub const MAX_PLAN_MONTHS: u32 = 18;
/// Milestone targets are clamped into this window after plan creation.
pub const MILESTONE_WINDOW_MONTHS: (u32, u32) = (3, 12);

const PHASE_NAMES: [(&str, &str); 4] = [
    ("Foundation", "Close the most urgent skill gaps"),
    ("Build", "Turn new skills into hands-on experience"),
    ("Position", "Make your experience visible to the right people"),
    ("Advance", "Step into the role"),
];

pub struct RecommendationEngine {
    analyzer: ProfileAnalyzer,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            analyzer: ProfileAnalyzer::new(),
        }
    }

    pub fn analyzer(&self) -> &ProfileAnalyzer {
        &self.analyzer
    }

    /// Suggest up to three career paths, best fit first.
    ///
    /// Always returns at least one path: when nothing in the catalog fits, a
    /// generic exploration path explains why.
    pub fn generate_career_paths(&self, profile: &UserProfile) -> Vec<CareerPath> {
        let mut paths: Vec<CareerPath> = catalog::CAREERS
            .iter()
            .map(|template| self.career_path_for(template, profile))
            .filter(|path| path.fit_score >= MIN_FIT_SCORE)
            .collect();

        paths.sort_by(|a, b| b.fit_score.total_cmp(&a.fit_score));
        paths.truncate(MAX_CAREER_PATHS);

        if paths.is_empty() {
            debug!(user_id = %profile.id, "No catalog career fits, using exploration path");
            paths.push(exploration_path(profile));
        }
        paths
    }

    /// Build a path for a specific catalog career, scored against `profile`.
    pub fn career_path_for(&self, template: &CareerTemplate, profile: &UserProfile) -> CareerPath {
        let matched_interests: Vec<&str> = template
            .interest_tags
            .iter()
            .copied()
            .filter(|tag| {
                profile
                    .career
                    .interests
                    .iter()
                    .any(|interest| contains_phrase(interest, tag) || contains_phrase(tag, interest))
            })
            .collect();
        let known_skills: Vec<&str> = template
            .required_skills
            .iter()
            .copied()
            .filter(|skill| profile.knows_of(skill))
            .collect();

        let interest_score = (matched_interests.len() as f64 / 2.0).min(1.0);
        let skill_score = known_skills.len() as f64 / template.required_skills.len().max(1) as f64;
        let fit_score = 0.6 * interest_score + 0.4 * skill_score;

        let mut reasons = Vec::new();
        if !matched_interests.is_empty() {
            reasons.push(format!("matches your interest in {}", matched_interests.join(", ")));
        }
        if !known_skills.is_empty() {
            reasons.push(format!("builds on your {} skills", known_skills.join(", ")));
        }
        let reasoning = if reasons.is_empty() {
            format!(
                "{} is a new direction for you; it would mean learning {} from scratch.",
                template.title,
                template.required_skills.join(", ")
            )
        } else {
            format!("{} {}.", template.title, reasons.join(" and "))
        };

        let missing = template
            .required_skills
            .iter()
            .filter(|skill| profile.skill_level(skill).is_none_or(|level| level < STRONG_SKILL_LEVEL))
            .count();

        CareerPath {
            id: template.id.to_string(),
            title: template.title.to_string(),
            description: template.description.to_string(),
            reasoning,
            fit_score,
            required_skills: template.required_skills.iter().map(|s| s.to_string()).collect(),
            time_to_transition: time_to_transition(missing).to_string(),
            growth_potential: template.growth_potential.to_string(),
        }
    }

    /// Path for a free-text field name, if the catalog knows it.
    pub fn career_path_for_field(&self, field: &str, profile: &UserProfile) -> Option<CareerPath> {
        catalog::find_career(field).map(|template| self.career_path_for(template, profile))
    }

    /// Skills to learn for `path`, dependencies first, then by priority,
    /// gap size and the path's own skill order.
    ///
    /// Dependencies the user already covers, or that are not part of the
    /// recommendation, are not listed. Cycles are cut at the best-ranked
    /// skill, which then lists none of the cut edges.
    pub fn recommend_skills(&self, profile: &UserProfile, path: &CareerPath) -> Vec<SkillRecommendation> {
        let gaps = self.analyzer.identify_gaps(profile, path);

        let deps: Vec<Vec<usize>> = gaps
            .iter()
            .map(|gap| {
                catalog::skill_info(&gap.skill)
                    .map(|info| {
                        info.depends_on
                            .iter()
                            .filter_map(|dep| gaps.iter().position(|g| g.skill.eq_ignore_ascii_case(dep)))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();

        let ordered = order_by_dependencies(&deps, |i| (Reverse(gaps[i].priority), Reverse(gaps[i].severity())));
        if !ordered.broken.is_empty() {
            debug!(path = %path.id, broken = ordered.broken.len(), "Broke dependency cycle");
        }

        ordered
            .order
            .iter()
            .map(|&i| {
                let dependencies: Vec<String> = deps[i]
                    .iter()
                    .filter(|&&d| d != i && !ordered.broken.contains(&(i, d)))
                    .map(|&d| gaps[d].skill.clone())
                    .collect();
                skill_recommendation(&gaps[i], path, dependencies)
            })
            .collect()
    }

    /// Concrete next steps toward `goals`, none further out than `horizon`.
    ///
    /// Higher-priority goals go first and steps are interleaved across goals
    /// so every goal gets an early step. Always includes a reflection step.
    pub fn create_action_steps(&self, goals: &[Goal], horizon: Timeframe) -> Vec<ActionStep> {
        let mut ordered: Vec<&Goal> = goals.iter().collect();
        ordered.sort_by_key(|g| Reverse(g.priority));

        let per_goal: Vec<Vec<ActionStep>> = ordered.iter().map(|goal| goal_steps(goal, horizon)).collect();
        let rounds = per_goal.iter().map(Vec::len).max().unwrap_or(0);

        let mut steps = Vec::new();
        for round in 0..rounds {
            for goal_steps in &per_goal {
                if let Some(step) = goal_steps.get(round) {
                    steps.push(step.clone());
                }
            }
        }
        steps.truncate(MAX_ACTION_STEPS);

        if !steps.iter().any(|s| s.category == ActionCategory::Reflection) {
            let reflect = ActionStep::new(
                "Reflect on your goals: write down where you want to be a year from now",
                Timeframe::Today.min(horizon),
                ActionCategory::Reflection,
            );
            if steps.len() == MAX_ACTION_STEPS {
                steps.pop();
            }
            steps.insert(0, reflect);
        }
        steps
    }

    /// A phased plan toward `path`, sized by how many skills are missing.
    pub fn build_growth_plan(&self, profile: &UserProfile, path: &CareerPath) -> GrowthPlan {
        self.build_growth_plan_at(profile, path, Utc::now())
    }

    pub(crate) fn build_growth_plan_at(
        &self,
        profile: &UserProfile,
        path: &CareerPath,
        created_at: DateTime<Utc>,
    ) -> GrowthPlan {
        let plan_id = format!("plan-{}", Uuid::new_v4());
        let skills = self.recommend_skills(profile, path);
        let timeline_months = (MIN_PLAN_MONTHS + 2 * skills.len() as u32).clamp(MIN_PLAN_MONTHS, MAX_PLAN_MONTHS);

        // cumulative months at the end of each phase, rounded half up
        let cumulative = |k: u32| (timeline_months * k + 2) / 4;

        let mut phases = Vec::with_capacity(PHASE_NAMES.len());
        let mut milestones = Vec::with_capacity(PHASE_NAMES.len());

        for (i, (name, summary)) in PHASE_NAMES.iter().enumerate() {
            let k = i as u32;
            let target_date = add_months_clamped(created_at, cumulative(k + 1));

            let objective = PhaseObjective {
                id: format!("{plan_id}-objective-{}", i + 1),
                description: format!("{summary} for {}", path.title),
                career_path_id: path.id.clone(),
            };

            let actions = phase_actions(i, path, &skills)
                .into_iter()
                .map(|(description, timeframe, category)| ActionStep {
                    due_date: Some(target_date),
                    objective_id: Some(objective.id.clone()),
                    ..ActionStep::new(description, timeframe, category)
                })
                .collect();

            milestones.push(Milestone {
                id: format!("{plan_id}-milestone-{}", i + 1),
                title: format!("{name} complete"),
                description: objective.description.clone(),
                target_date,
                completed: false,
                completed_date: None,
            });

            phases.push(Phase {
                name: name.to_string(),
                description: summary.to_string(),
                duration_months: cumulative(k + 1) - cumulative(k),
                objectives: vec![objective],
                actions,
            });
        }

        GrowthPlan {
            id: plan_id,
            user_id: profile.id.clone(),
            career_path: path.clone(),
            timeline_months,
            phases,
            milestones,
            created_at,
            last_updated: created_at,
        }
    }

    /// Plan a move from `source_field` into `target_field`.
    ///
    /// Difficulty combines how much of the target's skill set is missing
    /// with how far apart the two fields are.
    pub fn provide_transition_guidance(
        &self,
        source_field: &str,
        target_field: &str,
        profile: &UserProfile,
    ) -> TransitionPlan {
        let target = catalog::find_career(target_field);
        let source = catalog::find_career(source_field);

        let required: Vec<&str> = target.map(|t| t.required_skills.to_vec()).unwrap_or_default();
        let transferable_skills: Vec<String> = profile
            .skills
            .current
            .iter()
            .filter(|s| {
                required
                    .iter()
                    .chain(TRANSFERABLE_SKILLS.iter())
                    .any(|r| r.eq_ignore_ascii_case(&s.name))
            })
            .map(|s| s.name.clone())
            .collect();
        let skills_to_acquire: Vec<String> = required
            .iter()
            .filter(|skill| profile.skill_level(skill).is_none_or(|level| level < STRONG_SKILL_LEVEL))
            .map(|s| s.to_string())
            .collect();

        let gap_ratio = if required.is_empty() {
            1.0
        } else {
            skills_to_acquire.len() as f64 / required.len() as f64
        };
        let distance = match (source, target) {
            (Some(s), Some(t)) if s.id == t.id => 0.0,
            (Some(s), Some(t)) if s.cluster == t.cluster => 1.0,
            _ => 2.0,
        };
        let difficulty_level = difficulty(gap_ratio, distance);
        let estimated_duration = difficulty_level.estimated_duration();

        debug!(
            source = source_field,
            target = target_field,
            gap_ratio,
            distance,
            difficulty = %difficulty_level,
            "Assessed transition"
        );

        let target_name = target.map(|t| t.title).unwrap_or(target_field);
        let phases = transition_phases(difficulty_level, target_name, &skills_to_acquire, &transferable_skills);

        let mut risks = Vec::new();
        if gap_ratio > 0.5 {
            risks.push("A large skill gap can stretch the timeline; protect weekly learning time".to_string());
        }
        if distance >= 2.0 {
            risks.push(format!(
                "Moving into {target_name} from an unrelated field may mean a temporary step down in seniority or pay"
            ));
        }
        if profile.mindset.confidence_level < 0.5 {
            risks.push("Low confidence can stall applications; line up people who will review your work".to_string());
        }
        if risks.is_empty() {
            risks.push(format!("Demand for {target_name} roles can shift while you transition"));
        }

        let mut success_factors = Vec::new();
        if !transferable_skills.is_empty() {
            success_factors.push(format!(
                "Lead with your transferable skills: {}",
                transferable_skills.join(", ")
            ));
        }
        success_factors.push("Consistent, scheduled learning every week".to_string());
        success_factors.push(format!("A network of people already working in {target_name}"));

        TransitionPlan {
            source_field: source_field.to_string(),
            target_field: target_field.to_string(),
            transferable_skills,
            skills_to_acquire,
            phases,
            estimated_duration,
            difficulty_level,
            risks,
            success_factors,
        }
    }

    /// Ways to grow without changing roles.
    pub fn suggest_in_role_growth(&self, profile: &UserProfile) -> InRoleGrowth {
        let current_role = profile
            .personal
            .current_role
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "your current role".to_string());

        let mut focus_areas: Vec<String> = profile
            .skills
            .current
            .iter()
            .filter(|s| s.level < 4)
            .map(|s| format!("Strengthen {}", s.name))
            .collect();
        focus_areas.extend(
            profile
                .skills
                .current
                .iter()
                .filter(|s| s.level >= STRONG_SKILL_LEVEL)
                .map(|s| format!("Mentor others in {}", s.name)),
        );
        if !profile.knows_of("Leadership") {
            focus_areas.push("Leadership".to_string());
        }
        if !profile.knows_of("Communication") {
            focus_areas.push("Communication".to_string());
        }
        focus_areas.truncate(4);
        let first_focus = focus_areas
            .first()
            .map(|f| f.to_lowercase())
            .unwrap_or_else(|| "your strongest skill".to_string());

        let next_steps = vec![
            ActionStep::new(
                format!("Ask your manager what the next level looks like for a {current_role}"),
                Timeframe::ThisWeek,
                ActionCategory::Networking,
            ),
            ActionStep::new(
                format!("Block two hours a week for {first_focus}"),
                Timeframe::ThisWeek,
                ActionCategory::Learning,
            ),
            ActionStep::new(
                "Volunteer for one stretch project that uses a skill you want to grow",
                Timeframe::ThisMonth,
                ActionCategory::Application,
            ),
        ];

        InRoleGrowth {
            current_role,
            focus_areas,
            next_steps,
        }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimated transition time given how many required skills are missing.
pub fn time_to_transition(missing_skills: usize) -> &'static str {
    match missing_skills {
        0..=1 => "3-6 months",
        2..=3 => "6-12 months",
        _ => "12-18 months",
    }
}

fn difficulty(gap_ratio: f64, distance: f64) -> DifficultyLevel {
    let score = gap_ratio * 2.0 + distance;
    if score < 1.5 {
        DifficultyLevel::Easy
    } else if score < 3.0 {
        DifficultyLevel::Moderate
    } else {
        DifficultyLevel::Challenging
    }
}

fn exploration_path(profile: &UserProfile) -> CareerPath {
    let reasoning = if profile.career.interests.is_empty() && profile.skills.current.is_empty() {
        "You haven't shared your interests or skills yet, so the best next move is structured \
         exploration to find the work that energizes you."
            .to_string()
    } else {
        let mut known: Vec<&str> = profile.career.interests.iter().map(String::as_str).collect();
        known.extend(profile.skills.current.iter().map(|s| s.name.as_str()));
        format!(
            "None of the paths I know line up closely with {} yet, so short hands-on experiments \
             are the fastest way to find a direction.",
            known.join(", ")
        )
    };

    CareerPath {
        id: "career_exploration".to_string(),
        title: "Career Exploration".to_string(),
        description: "Try a few fields hands-on before committing to one.".to_string(),
        reasoning,
        fit_score: 0.2,
        required_skills: vec!["Communication".to_string(), "Problem Solving".to_string()],
        time_to_transition: "1-3 months".to_string(),
        growth_potential: "Varies".to_string(),
    }
}

fn skill_recommendation(gap: &SkillGap, path: &CareerPath, dependencies: Vec<String>) -> SkillRecommendation {
    let mut reasoning = if gap.current_level == 0 {
        format!("{} needs {}, which you haven't started yet.", path.title, gap.skill)
    } else {
        format!(
            "{} needs {} at level {}; you're at {}.",
            path.title, gap.skill, gap.target_level, gap.current_level
        )
    };
    if !dependencies.is_empty() {
        reasoning.push_str(&format!(" Builds on {}.", dependencies.join(", ")));
    }

    let learning_resources = catalog::skill_info(&gap.skill)
        .map(|info| info.resources.iter().map(|r| r.to_string()).collect())
        .unwrap_or_else(|| vec![format!("An introductory {} course", gap.skill)]);

    SkillRecommendation {
        skill: gap.skill.clone(),
        priority: gap.priority,
        reasoning,
        learning_resources,
        estimated_time: gap.estimated_time.clone(),
        dependencies,
    }
}

fn goal_steps(goal: &Goal, horizon: Timeframe) -> Vec<ActionStep> {
    let desc = goal.description.trim();
    let templates = match goal.goal_type {
        GoalType::ShortTerm => [
            (
                format!("Write down what success looks like for \"{desc}\""),
                Timeframe::Today,
                ActionCategory::Reflection,
            ),
            (
                format!("Spend two focused hours on the first skill \"{desc}\" needs"),
                Timeframe::ThisWeek,
                ActionCategory::Learning,
            ),
            (
                format!("Reach out to one person who has already done \"{desc}\""),
                Timeframe::ThisWeek,
                ActionCategory::Networking,
            ),
        ],
        GoalType::LongTerm => [
            (
                format!("Break \"{desc}\" into three milestones"),
                Timeframe::ThisWeek,
                ActionCategory::Reflection,
            ),
            (
                format!("Schedule a course or resource that moves \"{desc}\" forward"),
                Timeframe::ThisMonth,
                ActionCategory::Learning,
            ),
            (
                format!("Apply what you've learned toward \"{desc}\" in a visible project"),
                Timeframe::ThisMonth,
                ActionCategory::Application,
            ),
        ],
    };

    templates
        .into_iter()
        .map(|(description, timeframe, category)| ActionStep::new(description, timeframe.min(horizon), category))
        .collect()
}

fn phase_actions(
    phase: usize,
    path: &CareerPath,
    skills: &[SkillRecommendation],
) -> Vec<(String, Timeframe, ActionCategory)> {
    let title = &path.title;
    match phase {
        0 => {
            let mut actions: Vec<_> = skills
                .iter()
                .take(2)
                .map(|s| (format!("Start learning {}", s.skill), Timeframe::ThisWeek, ActionCategory::Learning))
                .collect();
            if actions.is_empty() {
                actions.push((
                    format!("List the parts of {title} work you already do well"),
                    Timeframe::ThisWeek,
                    ActionCategory::Reflection,
                ));
            }
            actions
        }
        1 => {
            let focus = if skills.is_empty() {
                path.required_skills.join(", ")
            } else {
                skills.iter().take(3).map(|s| s.skill.as_str()).collect::<Vec<_>>().join(", ")
            };
            vec![(
                format!("Complete a small project that uses {focus}"),
                Timeframe::ThisMonth,
                ActionCategory::Application,
            )]
        }
        2 => vec![
            (
                "Update your resume and portfolio with the projects you've built".to_string(),
                Timeframe::ThisMonth,
                ActionCategory::Application,
            ),
            (
                format!("Have coffee chats with three people working as {title}"),
                Timeframe::ThisMonth,
                ActionCategory::Networking,
            ),
        ],
        _ => vec![(
            format!("Apply to five {title} roles or internal openings"),
            Timeframe::ThisMonth,
            ActionCategory::Application,
        )],
    }
}

fn transition_phases(
    difficulty: DifficultyLevel,
    target: &str,
    to_acquire: &[String],
    transferable: &[String],
) -> Vec<TransitionPhase> {
    let first_skills = if to_acquire.is_empty() {
        format!("the core tools of {target}")
    } else {
        to_acquire.iter().take(2).cloned().collect::<Vec<_>>().join(" and ")
    };
    let strengths = if transferable.is_empty() {
        "your existing experience".to_string()
    } else {
        transferable.join(", ")
    };

    let explore = (
        "Explore and validate",
        format!("Confirm {target} is right for you before investing heavily"),
        vec![
            format!("Interview two people working in {target}"),
            "Try a weekend project or short course as a test".to_string(),
        ],
    );
    let foundations = (
        "Build foundations",
        format!("Learn {first_skills}"),
        vec![format!("Start with {first_skills}"), "Set a fixed weekly study schedule".to_string()],
    );
    let experience = (
        "Gain experience",
        "Build proof you can do the work".to_string(),
        vec![
            "Complete two portfolio projects".to_string(),
            "Look for a volunteer or freelance project in the new field".to_string(),
        ],
    );
    let make_move = (
        "Make the move",
        format!("Position {strengths} for {target} roles"),
        vec![
            format!("Rewrite your resume around {strengths}"),
            format!("Apply to {target} roles and ask for referrals"),
        ],
    );

    let selected = match difficulty {
        DifficultyLevel::Easy => vec![foundations, make_move],
        DifficultyLevel::Moderate => vec![explore, foundations, make_move],
        DifficultyLevel::Challenging => vec![explore, foundations, experience, make_move],
    };

    let range = difficulty.estimated_duration();
    let n = selected.len() as u32;
    let duration = format!("{}-{} months", (range.min_months / n).max(1), range.max_months.div_ceil(n));

    selected
        .into_iter()
        .map(|(name, description, actions)| TransitionPhase {
            name: name.to_string(),
            description,
            duration: duration.clone(),
            actions,
        })
        .collect()
}

fn add_months_clamped(created_at: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    let (min, max) = MILESTONE_WINDOW_MONTHS;
    let months = months.clamp(min, max);
    created_at
        .checked_add_months(Months::new(months))
        .unwrap_or(created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Priority, Skill};
    use crate::recommend::model::DurationRange;

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new()
    }

    fn web_path() -> CareerPath {
        let profile = UserProfile::new("u1");
        engine().career_path_for_field("software engineer", &profile).unwrap()
    }

    #[test]
    fn empty_profile_gets_exploration_path() {
        let paths = engine().generate_career_paths(&UserProfile::new("u1"));
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].id, "career_exploration");
        assert!(!paths[0].reasoning.is_empty());
    }

    #[test]
    fn interests_drive_career_paths() {
        let mut profile = UserProfile::new("u1");
        profile.career.interests = vec!["data".into(), "statistics".into()];
        profile.skills.current.push(Skill::new("SQL", 6, "technical"));

        let paths = engine().generate_career_paths(&profile);
        assert!(!paths.is_empty() && paths.len() <= MAX_CAREER_PATHS);
        // data scientist: same interests, larger share of its skills already known
        assert_eq!(paths[0].id, "data_scientist");
        assert!(paths.windows(2).all(|w| w[0].fit_score >= w[1].fit_score));
        for path in &paths {
            assert!(!path.reasoning.is_empty());
            assert!(path.fit_score >= MIN_FIT_SCORE);
        }
        assert!(paths[0].reasoning.contains("data"));
        assert!(paths[0].reasoning.contains("SQL"));
    }

    #[test]
    fn unmatched_interests_fall_back_with_reasoning() {
        let mut profile = UserProfile::new("u1");
        profile.career.interests = vec!["gardening".into()];
        let paths = engine().generate_career_paths(&profile);
        assert_eq!(paths[0].id, "career_exploration");
        assert!(paths[0].reasoning.contains("gardening"));
    }

    #[test]
    fn transition_time_by_missing_skills() {
        assert_eq!(time_to_transition(0), "3-6 months");
        assert_eq!(time_to_transition(1), "3-6 months");
        assert_eq!(time_to_transition(3), "6-12 months");
        assert_eq!(time_to_transition(4), "12-18 months");
    }

    #[test]
    fn skills_respect_dependencies() {
        let mut profile = UserProfile::new("u1");
        profile.skills.current.push(Skill::new("Git", 2, "technical"));

        let recs = engine().recommend_skills(&profile, &web_path());
        let names: Vec<&str> = recs.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(names.len(), 5);

        for (i, rec) in recs.iter().enumerate() {
            for dep in &rec.dependencies {
                let j = names.iter().position(|n| n == dep).unwrap();
                assert!(j < i, "{dep} must precede {}", rec.skill);
            }
        }
        let react = recs.iter().find(|r| r.skill == "React").unwrap();
        assert_eq!(react.dependencies, vec!["JavaScript".to_string()]);
        // all high priority: severity decides, JavaScript (7) ahead of Git (5)
        assert_eq!(names[0], "JavaScript");
        assert!(recs.iter().all(|r| !r.learning_resources.is_empty()));
    }

    #[test]
    fn satisfied_dependencies_are_not_listed() {
        let mut profile = UserProfile::new("u1");
        profile.skills.current.push(Skill::new("JavaScript", 8, "technical"));

        let recs = engine().recommend_skills(&profile, &web_path());
        assert!(recs.iter().all(|r| r.skill != "JavaScript"));
        assert!(recs.iter().all(|r| r.dependencies.is_empty()));
    }

    #[test]
    fn priority_orders_independent_skills() {
        let mut profile = UserProfile::new("u1");
        profile.skills.current = vec![Skill::new("SQL", 5, "technical"), Skill::new("Git", 1, "technical")];
        let recs = engine().recommend_skills(&profile, &web_path());
        let sql = recs.iter().position(|r| r.skill == "SQL").unwrap();
        let git = recs.iter().position(|r| r.skill == "Git").unwrap();
        assert_eq!(recs[sql].priority, Priority::Medium);
        assert!(git < sql);
    }

    #[test]
    fn action_steps_without_goals_reflect() {
        let steps = engine().create_action_steps(&[], Timeframe::ThisWeek);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].category, ActionCategory::Reflection);
        assert!(steps[0].description.starts_with("Reflect on your goals"));
    }

    #[test]
    fn action_steps_interleave_goals_and_respect_horizon() {
        let goals = vec![
            Goal::new("g1", "Finish a SQL course", GoalType::ShortTerm).with_priority(Priority::Low),
            Goal::new("g2", "Become a data analyst", GoalType::LongTerm).with_priority(Priority::High),
        ];
        let steps = engine().create_action_steps(&goals, Timeframe::ThisWeek);

        assert_eq!(steps.len(), MAX_ACTION_STEPS);
        assert!(steps[0].description.contains("data analyst"));
        assert!(steps[1].description.contains("SQL course"));
        assert!(steps[2].description.contains("data analyst"));
        assert!(steps.iter().all(|s| s.timeframe <= Timeframe::ThisWeek));
        assert!(steps.iter().any(|s| s.category == ActionCategory::Reflection));
    }

    #[test]
    fn growth_plan_milestones_stay_in_window() {
        let created = Utc::now();
        let window_start = created.checked_add_months(Months::new(3)).unwrap();
        let window_end = created.checked_add_months(Months::new(12)).unwrap();

        for skill_count in [0, 5] {
            let mut profile = UserProfile::new("u1");
            if skill_count == 0 {
                for s in ["JavaScript", "React", "Node.js", "Git", "SQL"] {
                    profile.skills.current.push(Skill::new(s, 9, "technical"));
                }
            }
            let plan = engine().build_growth_plan_at(&profile, &web_path(), created);
            assert_eq!(plan.phases.len(), 4);
            assert_eq!(plan.milestones.len(), 4);
            assert_eq!(
                plan.phases.iter().map(|p| p.duration_months).sum::<u32>(),
                plan.timeline_months
            );
            for m in &plan.milestones {
                assert!(m.target_date >= window_start && m.target_date <= window_end);
            }
            assert!(plan.milestones.windows(2).all(|w| w[0].target_date <= w[1].target_date));
        }
    }

    #[test]
    fn growth_plan_actions_trace_to_path() {
        let plan = engine().build_growth_plan(&UserProfile::new("u1"), &web_path());
        assert_eq!(plan.timeline_months, 13);

        let objective_ids: Vec<&str> = plan.objectives().map(|o| o.id.as_str()).collect();
        assert!(plan.objectives().all(|o| o.career_path_id == plan.career_path.id));
        assert!(plan.actions().count() > 0);
        for action in plan.actions() {
            let id = action.objective_id.as_deref().unwrap();
            assert!(objective_ids.contains(&id));
        }
    }

    #[test]
    fn transition_within_cluster_is_easier() {
        let mut profile = UserProfile::new("u1");
        profile.skills.current = vec![
            Skill::new("SQL", 8, "technical"),
            Skill::new("Statistics", 8, "analytical"),
            Skill::new("Python", 8, "technical"),
            Skill::new("Communication", 6, "soft"),
        ];

        let near = engine().provide_transition_guidance("data analysis", "data science", &profile);
        let far = engine().provide_transition_guidance("marketing", "data science", &profile);
        assert!(near.difficulty_level <= far.difficulty_level);
        assert_eq!(near.skills_to_acquire, vec!["Machine Learning".to_string()]);
        assert!(near.transferable_skills.contains(&"Communication".to_string()));
        assert!(near.transferable_skills.contains(&"Python".to_string()));
    }

    #[test]
    fn unrelated_transition_is_challenging() {
        let profile = UserProfile::new("u1");
        let plan = engine().provide_transition_guidance("teaching", "software engineering", &profile);
        assert_eq!(plan.difficulty_level, DifficultyLevel::Challenging);
        assert!(plan.phases.len() > 1);
        assert_eq!(plan.estimated_duration, DurationRange { min_months: 12, max_months: 18 });
        assert!(!plan.risks.is_empty());
        assert!(!plan.success_factors.is_empty());
        assert_eq!(plan.skills_to_acquire.len(), 5);
    }

    #[test]
    fn difficulty_thresholds() {
        assert_eq!(difficulty(0.0, 1.0), DifficultyLevel::Easy);
        assert_eq!(difficulty(0.5, 1.0), DifficultyLevel::Moderate);
        assert_eq!(difficulty(0.5, 2.0), DifficultyLevel::Challenging);
        assert_eq!(difficulty(1.0, 0.0), DifficultyLevel::Moderate);
    }

    #[test]
    fn in_role_growth_uses_role_and_skills() {
        let mut profile = UserProfile::new("u1");
        profile.personal.current_role = Some("accountant".into());
        profile.skills.current = vec![Skill::new("Excel", 9, "technical"), Skill::new("SQL", 2, "technical")];

        let growth = engine().suggest_in_role_growth(&profile);
        assert_eq!(growth.current_role, "accountant");
        assert_eq!(growth.focus_areas[0], "Strengthen SQL");
        assert!(growth.focus_areas.contains(&"Mentor others in Excel".to_string()));
        assert!(growth.focus_areas.len() <= 4);
        assert_eq!(growth.next_steps.len(), 3);
    }
}
