//! Canned replies used when a request can't be served normally.
//!
//! The text never carries error detail; the error itself is logged.

use crate::classify::IntentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackContext {
    CareerPaths,
    Skills,
    Actions,
    ProfileAnalysis,
    Default,
}

impl FallbackContext {
    /// The context matching what the user asked for.
    pub fn for_intent(kind: IntentKind) -> Self {
        match kind {
            IntentKind::CareerClarity | IntentKind::TransitionGuidance => Self::CareerPaths,
            IntentKind::SkillGuidance => Self::Skills,
            IntentKind::ActionPlanning | IntentKind::GrowthPlanning => Self::Actions,
            IntentKind::ProfileBuilding | IntentKind::ProgressCheck => Self::ProfileAnalysis,
            IntentKind::MindsetSupport => Self::Default,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::CareerPaths => {
                "I'm having trouble putting together career path suggestions right now. \
                 While I sort that out: what kind of work has felt most energizing to you so far?"
            }
            Self::Skills => {
                "I couldn't pull together skill recommendations just now. In the meantime, \
                 which skill would make the biggest difference in your current work?"
            }
            Self::Actions => {
                "I wasn't able to build your action steps right now. Next step for today: \
                 write down the one goal that matters most to you this month. What is it?"
            }
            Self::ProfileAnalysis => {
                "I couldn't review your profile just now. Could you tell me a bit about your \
                 current role and what you'd like to change?"
            }
            Self::Default => {
                "Something went wrong on my side while preparing your answer. Could you tell \
                 me again what you'd like to focus on today?"
            }
        }
    }
}
