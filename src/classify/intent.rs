//! Intent classification and emotional-signal detection.

use serde::{Deserialize, Serialize};

use super::entities::{Entities, EntityExtractor};
use super::rules::RuleTable;

/// Confidence assigned when no intent rule matched.
pub const FALLBACK_CONFIDENCE: f64 = 0.4;

/// What the user is asking the coach for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    ProfileBuilding,
    CareerClarity,
    SkillGuidance,
    ActionPlanning,
    MindsetSupport,
    GrowthPlanning,
    TransitionGuidance,
    ProgressCheck,
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ProfileBuilding => "profile_building",
            Self::CareerClarity => "career_clarity",
            Self::SkillGuidance => "skill_guidance",
            Self::ActionPlanning => "action_planning",
            Self::MindsetSupport => "mindset_support",
            Self::GrowthPlanning => "growth_planning",
            Self::TransitionGuidance => "transition_guidance",
            Self::ProgressCheck => "progress_check",
        };
        write!(f, "{s}")
    }
}

/// A classified intent with its confidence and extracted entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    /// 0.0 to 1.0.
    pub confidence: f64,
    #[serde(default)]
    pub entities: Entities,
}

impl Intent {
    pub fn new(kind: IntentKind, confidence: f64) -> Self {
        Self {
            kind,
            confidence,
            entities: Entities::new(),
        }
    }
}

/// Emotional struggle signals. Any of these puts mindset support ahead of
/// tactical advice in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Overwhelm,
    Anxiety,
    Fear,
    SelfDoubt,
    Discouragement,
    Frustration,
}

/// Result of classifying one message.
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: Intent,
    /// Distinct emotional signals, in rule order.
    pub emotions: Vec<Emotion>,
}

impl Classification {
    pub fn has_emotional_struggle(&self) -> bool {
        !self.emotions.is_empty()
    }
}

/// Built-in intent rules, in precedence order.
pub fn intent_rules() -> RuleTable<IntentKind> {
    use IntentKind::*;
    RuleTable::from_static(
        "intent",
        &[
            (
                TransitionGuidance,
                "career change",
                r"(\bswitch(ing)? (careers?|fields?|industr\w*|to|into)|\btransition\w*|change (careers?|fields?|industr\w*)|career change|\bpivot\w*|mov(e|ing) into|break(ing)? into)",
            ),
            (TransitionGuidance, "leave field", r"leav(e|ing) (my|the) (field|industry|profession)"),
            (
                ProgressCheck,
                "progress",
                r"(\bprogress\b|how am i doing|\bcompleted\b|\bfinished\b|\bdone with\b|check[- ]in|update on my)",
            ),
            (
                ActionPlanning,
                "next steps",
                r"(next steps?|action plan|what should i do (next|now|first|today|this week)|where (do|should) i (start|begin)|concrete steps?)",
            ),
            (ActionPlanning, "timebox", r"(\bthis week\b|\btoday\b|\bthis month\b)"),
            (
                SkillGuidance,
                "skills",
                r"(\bskills?\b|\blearn\w*|\bcourses?\b|\bcertif\w*|\bstudy\w*|\btraining\b|\bupskill\w*)",
            ),
            (
                GrowthPlanning,
                "growth",
                r"(\bgrow\w*|\bpromot\w*|long[- ]term|\broadmap\b|\badvance\w*|(five|5|ten|10) years|\bsenior\b|level up)",
            ),
            (
                MindsetSupport,
                "mindset",
                r"(\bconfiden\w*|\bmotivat\w*|\bafraid\b|\bdoubt\w*|\bimpost[eo]r\b|\bmindset\b|believe in myself|\bnervous\b|\boverwhelm\w*)",
            ),
            (
                CareerClarity,
                "career direction",
                r"(\bcareers?\b|\bpaths?\b|\bdirection\b|what (job|role|field)|\boptions\b|\bsuits? me\b|\bgood fit\b|what should i do with my life)",
            ),
            (
                ProfileBuilding,
                "about me",
                r"(about me|my background|\bi am an?\b|\bi'?m an?\b|i work as|years of experience|my (education|degree)|\binterested in\b)",
            ),
        ],
    )
}

/// Built-in emotional-signal rules.
pub fn emotion_rules() -> RuleTable<Emotion> {
    use Emotion::*;
    RuleTable::from_static(
        "emotion",
        &[
            (
                Overwhelm,
                "overwhelm",
                r"(\boverwhelm\w*|too much|burn(ed|t)?[- ]?out|\bexhaust\w*|can'?t keep up|\bswamped\b|\bdrowning\b)",
            ),
            (
                Anxiety,
                "anxiety",
                r"(\banxious\b|\banxiety\b|\bworried\b|\bworry\w*|\bnervous\b|\bpanic\w*|\bstress\w*)",
            ),
            (Fear, "fear", r"(\bscared\b|\bafraid\b|\bterrified\b|\bfear\w*)"),
            (
                SelfDoubt,
                "self doubt",
                r"(\bimpost[eo]r\b|not good enough|doubt myself|self[- ]doubt|\bworthless\b|\ba failure\b|\bincompetent\b)",
            ),
            (
                Discouragement,
                "discouragement",
                r"(\bhopeless\b|giv(e|ing) up|\bdefeated\b|\bdepress\w*|\bdiscouraged\b|\bpointless\b|\bsad\b)",
            ),
            (
                Frustration,
                "frustration",
                r"(\bfrustrat\w*|\bstuck\b|fed up|\bangry\b|hate my (job|work))",
            ),
        ],
    )
}

/// Rule-based intent classifier.
pub struct IntentClassifier {
    intents: RuleTable<IntentKind>,
    emotions: RuleTable<Emotion>,
    extractor: EntityExtractor,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            intents: intent_rules(),
            emotions: emotion_rules(),
            extractor: EntityExtractor::new(),
        }
    }

    /// Classify a message.
    ///
    /// The first matching intent rule decides the kind; confidence grows with
    /// the number of rules agreeing on that kind. When nothing matches the
    /// caller's `fallback` is used at [`FALLBACK_CONFIDENCE`].
    pub fn classify(&self, text: &str, fallback: IntentKind) -> Classification {
        let (kind, confidence) = match self.intents.first_match(text) {
            Some(rule) => {
                let agreeing = self
                    .intents
                    .all_matches(text)
                    .filter(|r| r.category == rule.category)
                    .count();
                (rule.category, (0.55 + 0.15 * agreeing as f64).min(0.95))
            }
            None => (fallback, FALLBACK_CONFIDENCE),
        };

        let mut emotions: Vec<Emotion> = Vec::new();
        for rule in self.emotions.all_matches(text) {
            if !emotions.contains(&rule.category) {
                emotions.push(rule.category);
            }
        }

        Classification {
            intent: Intent {
                kind,
                confidence,
                entities: self.extractor.extract(text),
            },
            emotions,
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
