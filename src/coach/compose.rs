//! Per-intent response text.

use crate::classify::Emotion;
use crate::profile::{Completeness, ProfileField, ProgressReport, UserProfile};
use crate::recommend::{
    ActionStep, CareerPath, GrowthPlan, InRoleGrowth, SkillRecommendation, TransitionPlan,
};

/// How many items of a list are spelled out in text.
const LIST_IN_TEXT: usize = 3;

pub fn mindset(emotions: &[Emotion], profile: &UserProfile) -> String {
    let opening = match emotions.first() {
        Some(Emotion::Overwhelm) => {
            "It sounds like a lot is landing on you at once. That's a signal to narrow your focus, \
             not a sign that you're failing."
        }
        Some(Emotion::Anxiety) | Some(Emotion::Fear) => {
            "Feeling uneasy about your career is normal, and it usually means the decision matters to you."
        }
        Some(Emotion::SelfDoubt) => {
            "Doubting yourself doesn't mean you lack ability. Most people feel this when they stretch \
             into something new."
        }
        Some(Emotion::Discouragement) => {
            "Careers rarely move in a straight line, and a setback now doesn't decide where you end up."
        }
        Some(Emotion::Frustration) => {
            "Feeling stuck is frustrating, and it's often the push that leads to a change worth making."
        }
        None => "Building confidence is part of the work, not a detour from it.",
    };

    let anchor = profile
        .skills
        .current
        .iter()
        .max_by_key(|s| s.level)
        .map(|s| format!(" You already bring real strength in {}.", s.name))
        .unwrap_or_default();

    format!(
        "{opening}{anchor}\n\nNext step: write down one thing you handled well this month, however small."
    )
}

pub fn question_for(field: ProfileField) -> &'static str {
    match field {
        ProfileField::CurrentRole => "What do you do right now, and how long have you been doing it?",
        ProfileField::Education => "What's your educational background?",
        ProfileField::Goals => "Where would you like your career to be a year from now?",
        ProfileField::Interests => "What kind of work or topics genuinely interest you?",
        ProfileField::Struggles => "What feels hardest about your career right now?",
    }
}

pub fn profile_building(profile: &UserProfile, completeness: &Completeness, noted: &[String]) -> String {
    let mut text = String::new();
    if !noted.is_empty() {
        text.push_str(&format!("Thanks, I've noted {}.\n\n", noted.join(", ")));
    }
    match completeness.missing_fields.first() {
        Some(field) => {
            if noted.is_empty() {
                text.push_str("Let's build a picture of where you are so the advice fits you.\n\n");
            }
            text.push_str(question_for(*field));
        }
        None => {
            text.push_str(&format!(
                "I have a good picture of you now: {} with {} goal(s) and interests in {}. \
                 Would you like to explore career paths, skills, or concrete next steps?",
                profile.personal.current_role.as_deref().unwrap_or("someone"),
                profile.career.goals.len(),
                profile.career.interests.join(", ")
            ));
        }
    }
    text
}

pub fn career_paths(paths: &[CareerPath]) -> String {
    let mut text = String::from("Here are the directions that fit you best:\n");
    for path in paths.iter().take(LIST_IN_TEXT) {
        text.push_str(&format!(
            "\n- {} ({:.0}% fit, {}): {}",
            path.title,
            path.fit_score * 100.0,
            path.time_to_transition,
            path.reasoning
        ));
    }
    text.push_str("\n\nWhich of these feels closest to what you want?");
    text
}

pub fn skills(path: &CareerPath, skills: &[SkillRecommendation]) -> String {
    if skills.is_empty() {
        return format!(
            "You already cover the core skills for {}. Next step: pick a project that shows them off.",
            path.title
        );
    }
    let mut text = format!("To move toward {}, learn these in order:\n", path.title);
    for (i, skill) in skills.iter().take(LIST_IN_TEXT).enumerate() {
        text.push_str(&format!(
            "\n{}. {} ({} priority, {}): {}",
            i + 1,
            skill.skill,
            skill.priority,
            skill.estimated_time,
            skill.reasoning
        ));
    }
    if let Some(resource) = skills[0].learning_resources.first() {
        text.push_str(&format!("\n\nNext step: start {} with \"{}\".", skills[0].skill, resource));
    }
    text
}

pub fn actions(steps: &[ActionStep]) -> String {
    let mut text = String::from("Here's what to do next:\n");
    for step in steps {
        text.push_str(&format!("\n- [{}] {}", step.timeframe, step.description));
    }
    text.push_str("\n\nWhich of these will you start with?");
    text
}

pub fn growth(plan: &GrowthPlan, in_role: Option<&InRoleGrowth>) -> String {
    let mut text = format!(
        "Here's a {}-month plan toward {}:\n",
        plan.timeline_months, plan.career_path.title
    );
    for phase in &plan.phases {
        text.push_str(&format!("\n- {} ({} mo): {}", phase.name, phase.duration_months, phase.description));
    }
    if let Some(growth) = in_role {
        text.push_str(&format!(
            "\n\nWithin your role as {}, focus on: {}.",
            growth.current_role,
            growth.focus_areas.join(", ")
        ));
    }
    if let Some(first) = plan.phases.first().and_then(|p| p.actions.first()) {
        text.push_str(&format!("\n\nNext step: {}.", first.description));
    }
    text
}

pub fn transition(plan: &TransitionPlan) -> String {
    let mut text = format!(
        "Moving from {} to {} looks {} and typically takes {}.",
        plan.source_field, plan.target_field, plan.difficulty_level, plan.estimated_duration
    );
    if !plan.transferable_skills.is_empty() {
        text.push_str(&format!(
            " You can carry over {}.",
            plan.transferable_skills.join(", ")
        ));
    }
    if !plan.skills_to_acquire.is_empty() {
        text.push_str(&format!(
            " You'll need to build {}.",
            plan.skills_to_acquire.iter().take(LIST_IN_TEXT).cloned().collect::<Vec<_>>().join(", ")
        ));
    }
    for phase in &plan.phases {
        text.push_str(&format!("\n- {} ({}): {}", phase.name, phase.duration, phase.description));
    }
    if let Some(action) = plan.phases.first().and_then(|p| p.actions.first()) {
        text.push_str(&format!("\n\nNext step: {action}."));
    }
    text
}

pub fn progress(report: &ProgressReport, open_actions: &[ActionStep]) -> String {
    let mut text = format!(
        "You've completed {} action(s) so far and {} of {} milestone(s) this month. \
         {} skill(s) are at a strong level.",
        report.completed_actions, report.milestones_completed, report.total_milestones, report.skills_mastered
    );
    if report.goals_due > 0 {
        text.push_str(&format!(" {} goal(s) have reached their target date.", report.goals_due));
    }
    match open_actions.first() {
        Some(action) => text.push_str(&format!(
            "\n\nStill open: {}. What's getting in the way of finishing it?",
            action.description
        )),
        None => text.push_str("\n\nWhat would you like to work on next?"),
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::response::is_actionable;
    use crate::profile::Skill;
    use crate::recommend::{ActionCategory, RecommendationEngine, Timeframe};

    #[test]
    fn mindset_is_actionable_and_personal() {
        let mut profile = UserProfile::new("u1");
        profile.skills.current.push(Skill::new("Excel", 8, "technical"));
        let text = mindset(&[Emotion::Overwhelm], &profile);
        assert!(text.contains("Excel"));
        assert!(is_actionable(&text));
    }

    #[test]
    fn profile_building_asks_for_first_missing_field() {
        let profile = UserProfile::new("u1");
        let completeness = Completeness {
            is_complete: false,
            missing_fields: vec![ProfileField::Education, ProfileField::Goals],
        };
        let text = profile_building(&profile, &completeness, &["your role (teacher)".into()]);
        assert!(text.starts_with("Thanks, I've noted your role (teacher)."));
        assert!(text.ends_with(question_for(ProfileField::Education)));
    }

    #[test]
    fn every_section_is_actionable() {
        let engine = RecommendationEngine::new();
        let profile = UserProfile::new("u1");
        let paths = engine.generate_career_paths(&profile);
        let path = &paths[0];
        let plan = engine.build_growth_plan(&profile, path);
        let transition_plan = engine.provide_transition_guidance("teaching", "ux design", &profile);
        let steps = vec![ActionStep::new("Update resume", Timeframe::ThisWeek, ActionCategory::Application)];
        let report = engine
            .analyzer()
            .track_progress(&profile, &crate::profile::ReportingWindow::last_days(30));

        let texts = [
            career_paths(&paths),
            skills(path, &engine.recommend_skills(&profile, path)),
            skills(path, &[]),
            actions(&steps),
            growth(&plan, None),
            transition(&transition_plan),
            progress(&report, &steps),
            progress(&report, &[]),
        ];
        for text in texts {
            assert!(is_actionable(&text), "{text}");
        }
    }
}
