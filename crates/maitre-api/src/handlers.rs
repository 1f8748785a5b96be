//! Route handler functions.
//!
//! The chat endpoint is the dialogue transport: one text message in, one
//! answer out. The voice endpoints deliver user intents and service
//! callbacks from the kiosk front-end into the controller and return the
//! post-event session snapshot for rendering.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use maitre_voice::SessionEvent;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request/response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CaptureErrorRequest {
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceStatusResponse {
    pub state: String,
    pub transcript: Option<String>,
    pub answer: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - liveness and uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /api/chat - the dialogue transport.
///
/// Missing or blank messages are rejected with 400 before the engine runs;
/// for anything else the engine is total and always answers.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".to_string()))?;

    let response = state.engine.respond(&message);
    Ok(Json(ChatResponse { response }))
}

/// GET /voice/status - current controller snapshot.
pub async fn voice_status(State(state): State<AppState>) -> Json<VoiceStatusResponse> {
    let controller = state.controller.lock().await;
    Json(status_of(&controller))
}

/// POST /voice/start - user pressed the microphone button.
pub async fn voice_start(State(state): State<AppState>) -> Json<VoiceStatusResponse> {
    deliver(&state, SessionEvent::StartPressed).await
}

/// POST /voice/stop-listening - user cancelled capture. No-op unless Listening.
pub async fn voice_stop_listening(State(state): State<AppState>) -> Json<VoiceStatusResponse> {
    deliver(&state, SessionEvent::StopListeningPressed).await
}

/// POST /voice/stop-speaking - user interrupted playback. No-op unless Speaking.
pub async fn voice_stop_speaking(State(state): State<AppState>) -> Json<VoiceStatusResponse> {
    deliver(&state, SessionEvent::StopSpeakingPressed).await
}

/// POST /voice/transcript - capture service delivered the final transcript.
pub async fn voice_transcript(
    State(state): State<AppState>,
    Json(req): Json<TranscriptRequest>,
) -> Result<Json<VoiceStatusResponse>, ApiError> {
    let text = req
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Transcript text is required".to_string()))?;
    Ok(deliver(&state, SessionEvent::TranscriptReady(text)).await)
}

/// POST /voice/capture-error - capture service reported a failure.
pub async fn voice_capture_error(
    State(state): State<AppState>,
    Json(req): Json<CaptureErrorRequest>,
) -> Json<VoiceStatusResponse> {
    let reason = req.error.unwrap_or_else(|| "unknown".to_string());
    deliver(&state, SessionEvent::CaptureFailed(reason)).await
}

/// POST /voice/capture-ended - capture ended without a transcript (silence).
pub async fn voice_capture_ended(State(state): State<AppState>) -> Json<VoiceStatusResponse> {
    deliver(&state, SessionEvent::CaptureEnded).await
}

/// POST /voice/playback-started - output service began playback.
pub async fn voice_playback_started(State(state): State<AppState>) -> Json<VoiceStatusResponse> {
    deliver(&state, SessionEvent::PlaybackStarted).await
}

/// POST /voice/playback-finished - output service finished playback.
pub async fn voice_playback_finished(State(state): State<AppState>) -> Json<VoiceStatusResponse> {
    deliver(&state, SessionEvent::PlaybackFinished).await
}

/// Apply one event to the controller and return the resulting snapshot.
async fn deliver(state: &AppState, event: SessionEvent) -> Json<VoiceStatusResponse> {
    let mut controller = state.controller.lock().await;
    controller.handle_event(event).await;
    Json(status_of(&controller))
}

fn status_of(controller: &maitre_voice::VoiceController) -> VoiceStatusResponse {
    let snapshot = controller.snapshot();
    VoiceStatusResponse {
        state: snapshot.state.to_string(),
        transcript: snapshot.transcript,
        answer: snapshot.answer,
        error: snapshot.error,
    }
}
