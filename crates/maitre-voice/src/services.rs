//! Service traits at the controller's seams.
//!
//! Real speech capture and playback live in the kiosk front-end; the
//! controller only ever talks to these traits. The no-op implementations
//! stand in for the browser services in the server process, where capture
//! results and playback callbacks arrive as HTTP events instead.

use async_trait::async_trait;

use maitre_core::error::Result;

/// Playback parameters forwarded to the speech output service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechParams {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Live-audio-to-transcript service. Single-utterance mode: one `start`
/// eventually yields one final transcript, one error, or silence.
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Begin capturing a single utterance.
    async fn start(&self) -> Result<()>;
    /// Cancel an in-progress capture. Any partial transcript is discarded.
    async fn stop(&self) -> Result<()>;
}

/// Text-to-audio playback service.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Begin rendering the text as speech. Returns once playback is
    /// triggered; completion arrives later as a playback-finished event.
    async fn speak(&self, text: &str, params: &SpeechParams) -> Result<()>;
    /// Stop any in-progress or queued playback immediately.
    async fn cancel(&self) -> Result<()>;
}

/// Request/response channel to the dialogue engine: one text message in,
/// one answer out. Implementations must reject empty or blank messages.
#[async_trait]
pub trait AnswerTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String>;
}

/// Capture stand-in for the server process. The kiosk front-end owns the
/// microphone and delivers transcripts over HTTP.
#[derive(Debug, Default)]
pub struct NoopCapture;

#[async_trait]
impl SpeechCapture for NoopCapture {
    async fn start(&self) -> Result<()> {
        tracing::debug!("Capture start requested (handled by front-end)");
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        tracing::debug!("Capture stop requested (handled by front-end)");
        Ok(())
    }
}

/// Playback stand-in for the server process.
#[derive(Debug, Default)]
pub struct NoopOutput;

#[async_trait]
impl SpeechOutput for NoopOutput {
    async fn speak(&self, text: &str, params: &SpeechParams) -> Result<()> {
        tracing::debug!(
            chars = text.len(),
            rate = params.rate,
            "Playback requested (handled by front-end)"
        );
        Ok(())
    }

    async fn cancel(&self) -> Result<()> {
        tracing::debug!("Playback cancel requested (handled by front-end)");
        Ok(())
    }
}
