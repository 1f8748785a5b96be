//! In-process transport from the voice controller to the dialogue engine.
//!
//! Mirrors the HTTP contract of `POST /api/chat` without the network hop:
//! empty or blank messages are rejected at this boundary, everything else
//! reaches the engine (which is total and never fails).

use std::sync::Arc;

use async_trait::async_trait;

use maitre_core::error::{MaitreError, Result};
use maitre_dialogue::DialogueEngine;
use maitre_voice::AnswerTransport;

/// Wraps the dialogue engine as an [`AnswerTransport`].
pub struct EngineTransport {
    engine: Arc<DialogueEngine>,
}

impl EngineTransport {
    pub fn new(engine: Arc<DialogueEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl AnswerTransport for EngineTransport {
    async fn send(&self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(MaitreError::EmptyMessage);
        }
        Ok(self.engine.respond(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maitre_kb::KnowledgeBase;

    fn transport() -> EngineTransport {
        let kb = Arc::new(KnowledgeBase::default_venue());
        EngineTransport::new(Arc::new(DialogueEngine::new(kb)))
    }

    #[tokio::test]
    async fn test_rejects_empty_message() {
        let t = transport();
        assert!(matches!(
            t.send("").await.unwrap_err(),
            MaitreError::EmptyMessage
        ));
        assert!(matches!(
            t.send("   ").await.unwrap_err(),
            MaitreError::EmptyMessage
        ));
    }

    #[tokio::test]
    async fn test_forwards_to_engine() {
        let t = transport();
        let answer = t.send("book a table").await.unwrap();
        assert!(answer.contains("(212) 555-0123"));
    }
}
