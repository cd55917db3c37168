//! Entity extraction from free-text messages.
//!
//! Pulls the handful of facts the coach can use to enrich a profile: years of
//! experience, current role, the field the user wants to move into, known
//! skills and interest areas.

use std::collections::BTreeMap;

use regex::Regex;

use crate::recommend::catalog::{self, contains_phrase};

pub const YEARS_OF_EXPERIENCE: &str = "years_of_experience";
pub const CURRENT_ROLE: &str = "current_role";
pub const TARGET_FIELD: &str = "target_field";
pub const SKILLS: &str = "skills";
pub const INTERESTS: &str = "interests";

/// Separator used for list-valued entities.
pub const LIST_SEPARATOR: &str = ", ";

/// Words that follow "I'm a" without naming a role ("I'm a bit lost").
const NOT_A_ROLE: &[&str] = &[
    "bit", "little", "lot", "total", "complete", "mess", "wreck", "fan", "big", "huge", "person",
    "kind", "sort", "very", "really", "pretty", "quite", "fairly", "good", "bad",
];

/// Extracted entities keyed by entity name.
pub type Entities = BTreeMap<String, String>;

pub struct EntityExtractor {
    years: Regex,
    role: Regex,
    target: Regex,
    interest_cue: Regex,
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self {
            years: Regex::new(
                r"(?i)\b(\d{1,2})\+?\s*(?:years?|yrs?)(?:\s+of)?\s+(?:experience|exp\b|working|in (?:the )?(?:industry|field|tech)|as an?\b)",
            )
            .unwrap(),
            role: Regex::new(
                r"(?i)\b(?:i work as|working as|my (?:current )?(?:role|job|title|position) is|i'?m currently|i am currently|i'?m|i am)\s+(?:an?\s+)([a-z][a-z/ -]{1,40}?)\s*(?:\bat\b|\bfor\b|\bin\b|\bwith\b|\band\b|\bbut\b|[.,!?;]|$)",
            )
            .unwrap(),
            target: Regex::new(
                r"(?i)\b(?:switch(?:ing)? (?:careers? )?(?:to|into)|transition(?:ing)? (?:to|into)|mov(?:e|ing) into|becom(?:e|ing) an?|pivot(?:ing)? (?:to|into)|break(?:ing)? into|get(?:ting)? into|a career in)\s+(?:the\s+)?([a-z][a-z/ -]{1,40}?)\s*(?:\bat\b|\bfor\b|\bfrom\b|\bbecause\b|\bbut\b|\band\b|\bso\b|[.,!?;]|$)",
            )
            .unwrap(),
            interest_cue: Regex::new(
                r"(?i)\b(?:interested in|passionate about|i (?:really )?(?:love|enjoy|like)|fascinated by|curious about|drawn to)\b",
            )
            .unwrap(),
        }
    }

    /// Extract every recognizable entity from `text`.
    pub fn extract(&self, text: &str) -> Entities {
        let mut entities = Entities::new();

        if let Some(years) = self.years.captures(text).and_then(|c| c.get(1)) {
            entities.insert(YEARS_OF_EXPERIENCE.to_string(), years.as_str().to_string());
        }

        if let Some(role) = self.role.captures(text).and_then(|c| c.get(1)) {
            let role = role.as_str().trim();
            let first_word = role.split_whitespace().next().unwrap_or_default().to_lowercase();
            if !NOT_A_ROLE.contains(&first_word.as_str()) {
                entities.insert(CURRENT_ROLE.to_string(), role.to_lowercase());
            }
        }

        if let Some(target) = self.target.captures(text).and_then(|c| c.get(1)) {
            entities.insert(TARGET_FIELD.to_string(), target.as_str().trim().to_lowercase());
        }

        let skills: Vec<&str> = catalog::SKILLS
            .iter()
            .map(|s| s.name)
            .filter(|name| contains_phrase(text, name))
            .collect();
        if !skills.is_empty() {
            entities.insert(SKILLS.to_string(), skills.join(LIST_SEPARATOR));
        }

        if self.interest_cue.is_match(text) {
            let interests: Vec<&str> = catalog::interest_tags()
                .into_iter()
                .filter(|tag| contains_phrase(text, tag))
                .collect();
            if !interests.is_empty() {
                entities.insert(INTERESTS.to_string(), interests.join(LIST_SEPARATOR));
            }
        }

        entities
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a list-valued entity back into its items.
pub fn entity_list(entities: &Entities, key: &str) -> Vec<String> {
    entities
        .get(key)
        .map(|v| {
            v.split(LIST_SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Entities {
        EntityExtractor::new().extract(text)
    }

    #[test]
    fn extracts_years_and_role() {
        let e = extract("I'm a high school teacher with 8 years of experience.");
        assert_eq!(e.get(CURRENT_ROLE).map(String::as_str), Some("high school teacher"));
        assert_eq!(e.get(YEARS_OF_EXPERIENCE).map(String::as_str), Some("8"));
    }

    #[test]
    fn role_after_work_as() {
        let e = extract("I work as an accountant at a small firm");
        assert_eq!(e.get(CURRENT_ROLE).map(String::as_str), Some("accountant"));
    }

    #[test]
    fn filler_is_not_a_role() {
        let e = extract("I'm a bit lost right now");
        assert!(!e.contains_key(CURRENT_ROLE));
    }

    #[test]
    fn future_years_are_not_experience() {
        let e = extract("In 5 years I want to lead a team");
        assert!(!e.contains_key(YEARS_OF_EXPERIENCE));
    }

    #[test]
    fn extracts_target_field() {
        let e = extract("I want to switch into data science because I love numbers");
        assert_eq!(e.get(TARGET_FIELD).map(String::as_str), Some("data science"));

        let e = extract("How do I become a UX designer?");
        assert_eq!(e.get(TARGET_FIELD).map(String::as_str), Some("ux designer"));
    }

    #[test]
    fn extracts_known_skills() {
        let e = extract("I know some Python and SQL, and a little React");
        assert_eq!(entity_list(&e, SKILLS), vec!["React", "SQL", "Python"]);
    }

    #[test]
    fn interests_need_a_cue() {
        let e = extract("I'm really passionate about design and writing");
        assert_eq!(entity_list(&e, INTERESTS), vec!["design", "writing"]);

        let e = extract("The design review went badly");
        assert!(!e.contains_key(INTERESTS));
    }

    #[test]
    fn empty_text_has_no_entities() {
        assert!(extract("").is_empty());
        assert!(entity_list(&Entities::new(), SKILLS).is_empty());
    }
}
