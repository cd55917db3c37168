//! Deterministic text classification.
//!
//! Everything here is keyword/regex rule matching over ordered tables; no
//! learned inference. Intent, challenge category and emotional signals each
//! have their own table so the policies can be audited and tested apart from
//! the orchestration code.

pub mod challenge;
pub mod entities;
pub mod intent;
pub mod rules;

pub use challenge::{DEFAULT_CHALLENGE, challenge_rules, struggle_cue};
pub use entities::{Entities, EntityExtractor, entity_list};
pub use intent::{Classification, Emotion, Intent, IntentClassifier, IntentKind};
pub use rules::{Rule, RuleTable};
