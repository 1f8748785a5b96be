//! The dialogue response engine.

use std::sync::Arc;

use maitre_kb::KnowledgeBase;

use crate::rules::{fallback_response, RuleTable};

/// Classifies utterances and renders answers from the knowledge base.
///
/// `respond` is total: every utterance yields a non-empty answer. Empty or
/// blank input is rejected upstream at the transport boundary, never here.
pub struct DialogueEngine {
    kb: Arc<KnowledgeBase>,
    rules: RuleTable,
}

impl DialogueEngine {
    /// Create an engine over the given knowledge base snapshot.
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self {
            kb,
            rules: RuleTable::new(),
        }
    }

    /// Classify the utterance and render the matching response.
    ///
    /// The utterance is folded to lowercase before matching; no other
    /// normalization is applied. The first rule in declaration order whose
    /// trigger set matches wins; unmatched utterances get the fallback
    /// prompt.
    pub fn respond(&self, utterance: &str) -> String {
        let lowered = utterance.to_lowercase();
        match self.rules.first_match(&lowered) {
            Some(rule) => {
                tracing::debug!(topic = rule.topic, "Intent matched");
                (rule.render)(&self.kb)
            }
            None => {
                tracing::debug!("No intent matched, using fallback");
                fallback_response(&self.kb)
            }
        }
    }

    /// The knowledge base this engine reads.
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }
}
