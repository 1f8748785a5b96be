//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use maitre_core::config::MaitreConfig;
use maitre_dialogue::DialogueEngine;
use maitre_kb::KnowledgeBase;
use maitre_voice::{NoopCapture, NoopOutput, SpeechParams, VoiceController};

use crate::transport::EngineTransport;

/// Shared application state.
///
/// The engine and knowledge base are read-only and cheaply cloned via
/// `Arc`. The voice controller is behind an async `Mutex` so that every
/// event is applied serially, preserving the mutual-exclusion invariant
/// even though handlers run concurrently.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration snapshot.
    pub config: Arc<MaitreConfig>,
    /// Venue knowledge base.
    pub kb: Arc<KnowledgeBase>,
    /// Dialogue response engine.
    pub engine: Arc<DialogueEngine>,
    /// Voice interaction controller, serialized behind a mutex.
    pub controller: Arc<Mutex<VoiceController>>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Build the state: engine over the KB, controller wired to an
    /// in-process engine transport and front-end service stand-ins.
    pub fn new(config: MaitreConfig, kb: KnowledgeBase) -> Self {
        let kb = Arc::new(kb);
        let engine = Arc::new(DialogueEngine::new(Arc::clone(&kb)));

        let controller = VoiceController::new(
            Box::new(NoopCapture),
            Box::new(NoopOutput),
            Box::new(EngineTransport::new(Arc::clone(&engine))),
        )
        .with_speech_params(SpeechParams {
            rate: config.speech.rate,
            pitch: config.speech.pitch,
            volume: config.speech.volume,
        })
        .with_transport_timeout(Duration::from_secs(config.transport.timeout_secs));

        Self {
            config: Arc::new(config),
            kb,
            engine,
            controller: Arc::new(Mutex::new(controller)),
            start_time: Instant::now(),
        }
    }
}
