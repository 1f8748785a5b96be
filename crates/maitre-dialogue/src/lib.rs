//! Dialogue response engine for the Maitre kiosk.
//!
//! Classifies a transcribed utterance against an ordered table of intent
//! rules (trigger substring sets bound to response templates over the venue
//! knowledge base) and renders a natural-language answer. Pure and total:
//! every utterance produces an answer, unmatched ones fall through to the
//! generic prompt.

pub mod engine;
pub mod rules;

pub use engine::DialogueEngine;
pub use rules::{IntentRule, RuleTable};
