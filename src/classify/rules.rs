//! Ordered pattern → category rule tables.
//!
//! Tables are evaluated top to bottom and the first matching rule wins, so the
//! order rules are declared in *is* the matching policy. Keeping the table as
//! data makes the policy easy to audit and to test on its own.

use regex::Regex;
use tracing::debug;

/// A single classification rule with a compiled regex.
#[derive(Debug, Clone)]
pub struct Rule<C> {
    /// Category assigned when the rule matches.
    pub category: C,
    /// Compiled, case-insensitive pattern.
    pub regex: Regex,
    /// Human-readable name used in logs.
    pub label: String,
}

/// An ordered list of rules, first match wins.
#[derive(Debug, Clone)]
pub struct RuleTable<C> {
    name: &'static str,
    rules: Vec<Rule<C>>,
}

impl<C: Copy + std::fmt::Debug> RuleTable<C> {
    /// Create an empty table (for testing or custom policies).
    pub fn empty(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    /// Build a table from built-in `(category, label, pattern)` triples.
    ///
    /// Patterns are compiled case-insensitively. Built-in patterns are
    /// constants covered by tests, so a bad one is a programming error.
    pub fn from_static(name: &'static str, rules: &[(C, &str, &str)]) -> Self {
        let mut table = Self::empty(name);
        for (category, label, pattern) in rules {
            table
                .push(*category, label, pattern)
                .unwrap_or_else(|e| panic!("built-in {name} rule {label:?} is invalid: {e}"));
        }
        table
    }

    /// Append a rule at the lowest precedence.
    pub fn push(&mut self, category: C, label: &str, pattern: &str) -> Result<(), regex::Error> {
        self.rules.push(Rule {
            category,
            regex: Regex::new(&format!("(?i){pattern}"))?,
            label: label.to_string(),
        });
        Ok(())
    }

    /// First rule matching `text`, if any.
    pub fn first_match(&self, text: &str) -> Option<&Rule<C>> {
        let hit = self.rules.iter().find(|rule| rule.regex.is_match(text));
        if let Some(rule) = hit {
            debug!(
                table = self.name,
                rule = %rule.label,
                category = ?rule.category,
                "Rule matched"
            );
        }
        hit
    }

    /// Category of the first matching rule, or `default`.
    pub fn classify_or(&self, text: &str, default: C) -> C {
        self.first_match(text).map(|r| r.category).unwrap_or(default)
    }

    /// All rules matching `text`, in table order.
    pub fn all_matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Rule<C>> + 'a {
        self.rules.iter().filter(move |rule| rule.regex.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Color {
        Red,
        Blue,
    }

    fn table() -> RuleTable<Color> {
        RuleTable::from_static(
            "colors",
            &[
                (Color::Red, "red", r"\b(red|crimson)\b"),
                (Color::Blue, "blue", r"\b(blue|navy)\b"),
            ],
        )
    }

    #[test]
    fn first_declared_rule_wins() {
        let rules = table();
        assert_eq!(rules.classify_or("navy and crimson", Color::Blue), Color::Red);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = table();
        assert_eq!(rules.first_match("NAVY").map(|r| r.category), Some(Color::Blue));
    }

    #[test]
    fn default_when_nothing_matches() {
        let rules = table();
        assert!(rules.first_match("green").is_none());
        assert_eq!(rules.classify_or("green", Color::Blue), Color::Blue);
    }

    #[test]
    fn all_matches_keeps_table_order() {
        let rules = table();
        let hits: Vec<_> = rules.all_matches("blue, red").map(|r| r.category).collect();
        assert_eq!(hits, vec![Color::Red, Color::Blue]);
    }

    #[test]
    fn custom_rule_is_appended_last() {
        let mut rules = RuleTable::empty("custom");
        rules.push(Color::Blue, "sky", r"\bsky\b").unwrap();
        assert_eq!(rules.len(), 1);
        assert!(rules.push(Color::Red, "broken", r"(unclosed").is_err());
        assert_eq!(rules.len(), 1);
    }
}
