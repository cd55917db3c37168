//! Struggle → challenge category rules.

use regex::Regex;

use crate::profile::ChallengeType;

use super::rules::RuleTable;

/// Category used when no rule matches.
///
/// A product assumption: every struggle gets a usable category instead of an
/// "unknown" bucket, and an unplaced struggle is most often a direction
/// problem.
pub const DEFAULT_CHALLENGE: ChallengeType = ChallengeType::Direction;

/// Built-in challenge rules, in precedence order.
pub fn challenge_rules() -> RuleTable<ChallengeType> {
    use ChallengeType::*;
    RuleTable::from_static(
        "challenge",
        &[
            (
                Direction,
                "unclear direction",
                r"(don'?t know what|not sure what|no idea (what|where)|\blost\b|\bdirection\b|\bpurpose\b|which (career|path|field)|what (career|path|job) (to|should)|confused about (my )?(career|future))",
            ),
            (
                Skills,
                "missing skills",
                r"(\bskills?\b|\bqualifi\w*|lack(ing)? (the )?(knowledge|training|experience)|don'?t know how to|\bcertif\w*|\btechnical\b|\boutdated\b)",
            ),
            (
                Confidence,
                "low confidence",
                r"(\bconfiden\w*|\bimpost[eo]r\b|not good enough|self[- ]doubt|doubt myself|\binsecure\b|\bafraid\b|\bscared\b|\bfear\w*)",
            ),
            (
                Overwhelm,
                "overwhelm",
                r"(\boverwhelm\w*|too (much|many)|\bstress\w*|burn(ed|t)?[- ]?out|\bexhaust\w*|can'?t keep up|\bswamped\b)",
            ),
            (
                Transition,
                "career change",
                r"(\bswitch\w*|\btransition\w*|change (careers?|fields?|industr\w*|jobs?)|career change|\bpivot\w*|move into|leave my (job|field|industry))",
            ),
            (
                Stagnation,
                "stagnation",
                r"(\bstuck\b|\bstagnat\w*|\bplateau\w*|no growth|not growing|\bbored\b|dead[- ]end|same (role|job|position)|passed over|no promotion)",
            ),
        ],
    )
}

/// Phrases that mark a message as describing a struggle rather than just
/// asking a question.
pub fn struggle_cue() -> Regex {
    Regex::new(
        r"(?i)(\bstruggl\w*|\bstuck\b|\bhard\b|\bdifficult\w*|\bchalleng\w*|\blost\b|don'?t know (what|how)|not sure what|no idea|\black(ing)?\b|\boutdated\b|\bcan'?t\b|\bburn(ed|t)?[- ]?out|\bunhappy\b|\bhate\b|\bbored\b|passed over)",
    )
    .unwrap()
}
