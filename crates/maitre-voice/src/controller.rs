//! The voice interaction controller.
//!
//! All mutation is funneled through the pure [`transition`] function, which
//! maps `(state, event)` to `(state, effects)`. The [`VoiceController`]
//! applies transitions, keeps the per-cycle session data (transcript,
//! answer, error), and executes effects against the service traits. Effects
//! that complete inline (the engine round trip, a failed capture start)
//! feed follow-up events back into the same dispatch loop; effects whose
//! completion is observed externally (playback finished, final transcript)
//! arrive later as new events.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::{AnswerTransport, SpeechCapture, SpeechOutput, SpeechParams};
use crate::state::InteractionState;
use crate::TRANSPORT_APOLOGY;

/// An input to the state machine: a user intent or a service callback.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// User pressed the microphone button.
    StartPressed,
    /// User stopped an in-progress capture.
    StopListeningPressed,
    /// User interrupted playback.
    StopSpeakingPressed,
    /// Capture produced the final transcript.
    TranscriptReady(String),
    /// Capture failed (microphone or recognition error).
    CaptureFailed(String),
    /// Capture ended without a transcript (silence).
    CaptureEnded,
    /// The engine round trip returned an answer.
    AnswerReady(String),
    /// The engine round trip failed or timed out.
    TransportFailed(String),
    /// Playback reported it has begun.
    PlaybackStarted,
    /// Playback could not be started.
    PlaybackFailed(String),
    /// Playback reported completion.
    PlaybackFinished,
}

/// A side effect the controller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Tell the output service to stop any in-flight playback.
    CancelPlayback,
    /// Begin a single-utterance capture.
    StartCapture,
    /// Cancel an in-progress capture.
    CancelCapture,
    /// Send the transcript to the dialogue engine.
    QueryEngine(String),
    /// Start speaking the answer.
    Speak(String),
}

/// The pure transition function.
///
/// Returns `None` when the event is out of phase and must be ignored: a
/// start while not Idle (phases are mutually exclusive), a stop that does
/// not apply (idempotent), or a stale service callback. `Some` carries the
/// new state and the effects to perform, in order.
pub fn transition(
    state: InteractionState,
    event: &SessionEvent,
) -> Option<(InteractionState, Vec<Effect>)> {
    use InteractionState::*;
    use SessionEvent::*;

    match (state, event) {
        // Starting is only permitted from Idle. Playback is cancelled
        // unconditionally before capture so a new utterance always
        // supersedes any still-in-flight answer.
        (Idle, StartPressed) => Some((
            Listening,
            vec![Effect::CancelPlayback, Effect::StartCapture],
        )),
        (Listening, TranscriptReady(text)) => {
            Some((Processing, vec![Effect::QueryEngine(text.clone())]))
        }
        (Listening, CaptureFailed(_)) => Some((Idle, vec![])),
        (Listening, CaptureEnded) => Some((Idle, vec![])),
        (Listening, StopListeningPressed) => Some((Idle, vec![Effect::CancelCapture])),
        (Processing, AnswerReady(answer)) => {
            Some((Speaking, vec![Effect::Speak(answer.clone())]))
        }
        (Processing, TransportFailed(_)) => Some((Idle, vec![])),
        (Speaking, PlaybackStarted) => Some((Speaking, vec![])),
        (Speaking, PlaybackFailed(_)) => Some((Idle, vec![])),
        (Speaking, PlaybackFinished) => Some((Idle, vec![])),
        (Speaking, StopSpeakingPressed) => Some((Idle, vec![Effect::CancelPlayback])),
        // Everything else is out of phase: idempotent stops, starts while
        // busy, and callbacks from a superseded cycle.
        _ => None,
    }
}

/// Read-only view of the controller for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: InteractionState,
    pub transcript: Option<String>,
    pub answer: Option<String>,
    pub error: Option<String>,
}

/// Identity and timing of one interaction cycle, for logging.
#[derive(Debug, Clone)]
struct InteractionCycle {
    id: Uuid,
    started_at: DateTime<Utc>,
}

impl InteractionCycle {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    fn elapsed_secs(&self) -> f32 {
        let elapsed = Utc::now() - self.started_at;
        elapsed.num_milliseconds() as f32 / 1000.0
    }
}

/// Owns the interaction state and the per-cycle session data.
///
/// All transitions go through [`transition`]; the controller never exposes
/// raw setters. Events must be delivered from a single logical thread (the
/// API layer serializes them behind a mutex).
pub struct VoiceController {
    state: InteractionState,
    cycle: Option<InteractionCycle>,
    transcript: Option<String>,
    answer: Option<String>,
    error: Option<String>,
    capture: Box<dyn SpeechCapture>,
    output: Box<dyn SpeechOutput>,
    transport: Box<dyn AnswerTransport>,
    speech_params: SpeechParams,
    transport_timeout: Duration,
}

impl VoiceController {
    /// Create an Idle controller over the given services.
    pub fn new(
        capture: Box<dyn SpeechCapture>,
        output: Box<dyn SpeechOutput>,
        transport: Box<dyn AnswerTransport>,
    ) -> Self {
        Self {
            state: InteractionState::Idle,
            cycle: None,
            transcript: None,
            answer: None,
            error: None,
            capture,
            output,
            transport,
            speech_params: SpeechParams::default(),
            transport_timeout: Duration::from_secs(10),
        }
    }

    /// Override the playback parameters.
    pub fn with_speech_params(mut self, params: SpeechParams) -> Self {
        self.speech_params = params;
        self
    }

    /// Override the bound on the engine round trip.
    pub fn with_transport_timeout(mut self, timeout: Duration) -> Self {
        self.transport_timeout = timeout;
        self
    }

    /// Current phase.
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Presentation snapshot: state, transcript, answer, error.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            transcript: self.transcript.clone(),
            answer: self.answer.clone(),
            error: self.error.clone(),
        }
    }

    /// Deliver an event and run the machine until quiescent.
    ///
    /// Effects whose outcome is known inline (engine round trip, service
    /// call failures) enqueue follow-up events processed in the same call.
    /// Returns the resulting state.
    pub async fn handle_event(&mut self, event: SessionEvent) -> InteractionState {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let Some((next, effects)) = transition(self.state, &event) else {
                tracing::debug!(state = %self.state, event = ?event, "Event ignored");
                continue;
            };
            debug_assert!(
                next == self.state || self.state.can_transition_to(&next),
                "transition table produced an illegal move: {} -> {}",
                self.state,
                next
            );
            self.record(&event);
            if next != self.state {
                tracing::debug!("Interaction state: {} -> {}", self.state, next);
            }
            self.state = next;
            for effect in effects {
                if let Some(follow_up) = self.perform(effect).await {
                    queue.push_back(follow_up);
                }
            }
        }
        self.state
    }

    /// Update session data for an accepted event.
    fn record(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::StartPressed => {
                let cycle = InteractionCycle::new();
                tracing::info!(cycle_id = %cycle.id, "Interaction cycle started");
                self.cycle = Some(cycle);
                self.transcript = None;
                self.answer = None;
                self.error = None;
            }
            SessionEvent::TranscriptReady(text) => {
                self.transcript = Some(text.clone());
            }
            SessionEvent::AnswerReady(answer) => {
                self.answer = Some(answer.clone());
            }
            SessionEvent::CaptureFailed(reason) => {
                tracing::warn!(reason = %reason, "Capture failed");
                self.error = Some(format!("Speech recognition error: {}", reason));
            }
            SessionEvent::TransportFailed(reason) => {
                tracing::warn!(reason = %reason, "Engine round trip failed");
                self.error = Some(TRANSPORT_APOLOGY.to_string());
            }
            SessionEvent::PlaybackFailed(reason) => {
                tracing::warn!(reason = %reason, "Playback failed");
                self.error = Some(format!("Speech output error: {}", reason));
            }
            SessionEvent::PlaybackFinished => {
                if let Some(cycle) = self.cycle.take() {
                    tracing::info!(
                        cycle_id = %cycle.id,
                        elapsed_secs = cycle.elapsed_secs(),
                        "Interaction cycle complete"
                    );
                }
            }
            _ => {}
        }
    }

    /// Execute one effect, returning a follow-up event when the outcome is
    /// known inline.
    async fn perform(&mut self, effect: Effect) -> Option<SessionEvent> {
        match effect {
            Effect::CancelPlayback => {
                if let Err(e) = self.output.cancel().await {
                    // Best effort: a failed cancel must not block a new cycle.
                    tracing::warn!(error = %e, "Playback cancel failed");
                }
                None
            }
            Effect::StartCapture => match self.capture.start().await {
                Ok(()) => None,
                Err(e) => Some(SessionEvent::CaptureFailed(e.to_string())),
            },
            Effect::CancelCapture => {
                if let Err(e) = self.capture.stop().await {
                    tracing::warn!(error = %e, "Capture cancel failed");
                }
                None
            }
            Effect::QueryEngine(message) => {
                let round_trip = self.transport.send(&message);
                match tokio::time::timeout(self.transport_timeout, round_trip).await {
                    Ok(Ok(answer)) => Some(SessionEvent::AnswerReady(answer)),
                    Ok(Err(e)) => Some(SessionEvent::TransportFailed(e.to_string())),
                    Err(_) => Some(SessionEvent::TransportFailed(format!(
                        "timed out after {:?}",
                        self.transport_timeout
                    ))),
                }
            }
            Effect::Speak(text) => match self.output.speak(&text, &self.speech_params).await {
                Ok(()) => None,
                Err(e) => Some(SessionEvent::PlaybackFailed(e.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use maitre_core::error::{MaitreError, Result};
    use std::sync::{Arc, Mutex};

    /// Records service calls for assertions; configurable failures.
    #[derive(Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn log(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    struct MockCapture {
        recorder: Recorder,
        fail_start: bool,
    }

    #[async_trait]
    impl SpeechCapture for MockCapture {
        async fn start(&self) -> Result<()> {
            self.recorder.log("capture.start");
            if self.fail_start {
                return Err(MaitreError::Capture("no microphone".to_string()));
            }
            Ok(())
        }
        async fn stop(&self) -> Result<()> {
            self.recorder.log("capture.stop");
            Ok(())
        }
    }

    struct MockOutput {
        recorder: Recorder,
    }

    #[async_trait]
    impl SpeechOutput for MockOutput {
        async fn speak(&self, text: &str, _params: &SpeechParams) -> Result<()> {
            self.recorder.log(&format!("output.speak:{}", text));
            Ok(())
        }
        async fn cancel(&self) -> Result<()> {
            self.recorder.log("output.cancel");
            Ok(())
        }
    }

    enum TransportBehavior {
        Answer(String),
        Fail,
        Hang,
    }

    struct MockTransport {
        recorder: Recorder,
        behavior: TransportBehavior,
    }

    #[async_trait]
    impl AnswerTransport for MockTransport {
        async fn send(&self, message: &str) -> Result<String> {
            self.recorder.log(&format!("transport.send:{}", message));
            match &self.behavior {
                TransportBehavior::Answer(answer) => Ok(answer.clone()),
                TransportBehavior::Fail => {
                    Err(MaitreError::Transport("engine returned 500".to_string()))
                }
                TransportBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!("hang transport should be timed out")
                }
            }
        }
    }

    fn make_controller(behavior: TransportBehavior) -> (VoiceController, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorder = |calls: &Arc<Mutex<Vec<String>>>| Recorder {
            calls: Arc::clone(calls),
        };
        let controller = VoiceController::new(
            Box::new(MockCapture {
                recorder: recorder(&calls),
                fail_start: false,
            }),
            Box::new(MockOutput {
                recorder: recorder(&calls),
            }),
            Box::new(MockTransport {
                recorder: recorder(&calls),
                behavior,
            }),
        );
        (controller, calls)
    }

    fn calls_of(calls: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        calls.lock().unwrap().clone()
    }

    #[test]
    fn test_transition_start_only_from_idle() {
        assert!(transition(InteractionState::Idle, &SessionEvent::StartPressed).is_some());
        assert!(transition(InteractionState::Listening, &SessionEvent::StartPressed).is_none());
        assert!(transition(InteractionState::Processing, &SessionEvent::StartPressed).is_none());
        assert!(transition(InteractionState::Speaking, &SessionEvent::StartPressed).is_none());
    }

    #[test]
    fn test_transition_start_cancels_playback_before_capture() {
        let (next, effects) =
            transition(InteractionState::Idle, &SessionEvent::StartPressed).unwrap();
        assert_eq!(next, InteractionState::Listening);
        assert_eq!(effects, vec![Effect::CancelPlayback, Effect::StartCapture]);
    }

    #[test]
    fn test_transition_idempotent_stops() {
        assert!(transition(InteractionState::Idle, &SessionEvent::StopListeningPressed).is_none());
        assert!(transition(InteractionState::Idle, &SessionEvent::StopSpeakingPressed).is_none());
        assert!(
            transition(InteractionState::Listening, &SessionEvent::StopSpeakingPressed).is_none()
        );
        assert!(
            transition(InteractionState::Speaking, &SessionEvent::StopListeningPressed).is_none()
        );
    }

    #[test]
    fn test_transition_stale_callbacks_ignored() {
        assert!(transition(
            InteractionState::Idle,
            &SessionEvent::TranscriptReady("late".to_string())
        )
        .is_none());
        assert!(transition(InteractionState::Idle, &SessionEvent::PlaybackFinished).is_none());
        assert!(transition(
            InteractionState::Listening,
            &SessionEvent::AnswerReady("late".to_string())
        )
        .is_none());
        // onend after onresult arrives while already Processing.
        assert!(transition(InteractionState::Processing, &SessionEvent::CaptureEnded).is_none());
    }

    #[tokio::test]
    async fn test_full_cycle_friday_hours() {
        let answer = "Sajed Restaurant is open Tuesday through Saturday from 5 PM to 11 PM, \
                      Friday and Saturday until midnight, and Sunday from 5 PM to 10 PM.";
        let (mut controller, calls) =
            make_controller(TransportBehavior::Answer(answer.to_string()));

        assert_eq!(
            controller.handle_event(SessionEvent::StartPressed).await,
            InteractionState::Listening
        );
        let state = controller
            .handle_event(SessionEvent::TranscriptReady(
                "What time do you open on Friday?".to_string(),
            ))
            .await;
        // Engine round trip resolves inline; playback was triggered.
        assert_eq!(state, InteractionState::Speaking);

        let snapshot = controller.snapshot();
        assert_eq!(
            snapshot.transcript.as_deref(),
            Some("What time do you open on Friday?")
        );
        assert_eq!(snapshot.answer.as_deref(), Some(answer));
        assert!(snapshot.error.is_none());

        assert_eq!(
            controller.handle_event(SessionEvent::PlaybackStarted).await,
            InteractionState::Speaking
        );
        assert_eq!(
            controller.handle_event(SessionEvent::PlaybackFinished).await,
            InteractionState::Idle
        );

        // Transcript and answer stay visible after the cycle ends.
        let snapshot = controller.snapshot();
        assert!(snapshot.transcript.is_some());
        assert!(snapshot.answer.is_some());

        let calls = calls_of(&calls);
        assert_eq!(
            calls,
            vec![
                "output.cancel".to_string(),
                "capture.start".to_string(),
                "transport.send:What time do you open on Friday?".to_string(),
                format!("output.speak:{}", answer),
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_goes_idle_without_playback() {
        let (mut controller, calls) = make_controller(TransportBehavior::Fail);

        controller.handle_event(SessionEvent::StartPressed).await;
        let state = controller
            .handle_event(SessionEvent::TranscriptReady("menu please".to_string()))
            .await;

        assert_eq!(state, InteractionState::Idle);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.error.as_deref(), Some(TRANSPORT_APOLOGY));
        // The transcript from this cycle is retained for display.
        assert_eq!(snapshot.transcript.as_deref(), Some("menu please"));
        assert!(snapshot.answer.is_none());
        // No playback was ever triggered.
        assert!(calls_of(&calls).iter().all(|c| !c.starts_with("output.speak")));
    }

    #[tokio::test]
    async fn test_transport_timeout_is_a_transport_failure() {
        let (mut controller, calls) = make_controller(TransportBehavior::Hang);
        controller = controller.with_transport_timeout(Duration::from_millis(20));

        controller.handle_event(SessionEvent::StartPressed).await;
        let state = controller
            .handle_event(SessionEvent::TranscriptReady("hello".to_string()))
            .await;

        assert_eq!(state, InteractionState::Idle);
        assert_eq!(controller.snapshot().error.as_deref(), Some(TRANSPORT_APOLOGY));
        assert!(calls_of(&calls).iter().all(|c| !c.starts_with("output.speak")));
    }

    #[tokio::test]
    async fn test_capture_error_goes_idle_without_transcript() {
        let (mut controller, _calls) =
            make_controller(TransportBehavior::Answer("unused".to_string()));

        controller.handle_event(SessionEvent::StartPressed).await;
        let state = controller
            .handle_event(SessionEvent::CaptureFailed("not-allowed".to_string()))
            .await;

        assert_eq!(state, InteractionState::Idle);
        let snapshot = controller.snapshot();
        assert!(snapshot.transcript.is_none());
        assert!(snapshot.error.as_deref().unwrap().contains("not-allowed"));
    }

    #[tokio::test]
    async fn test_capture_start_failure_recovers_to_idle() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut controller = VoiceController::new(
            Box::new(MockCapture {
                recorder: Recorder {
                    calls: Arc::clone(&calls),
                },
                fail_start: true,
            }),
            Box::new(MockOutput {
                recorder: Recorder {
                    calls: Arc::clone(&calls),
                },
            }),
            Box::new(MockTransport {
                recorder: Recorder {
                    calls: Arc::clone(&calls),
                },
                behavior: TransportBehavior::Answer("unused".to_string()),
            }),
        );

        let state = controller.handle_event(SessionEvent::StartPressed).await;
        assert_eq!(state, InteractionState::Idle);
        assert!(controller.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn test_start_ignored_while_busy() {
        let (mut controller, calls) =
            make_controller(TransportBehavior::Answer("the answer".to_string()));

        controller.handle_event(SessionEvent::StartPressed).await;
        controller
            .handle_event(SessionEvent::TranscriptReady("wine list".to_string()))
            .await;
        assert_eq!(controller.state(), InteractionState::Speaking);

        // A second start while Speaking must not restart capture.
        let before = calls_of(&calls).len();
        let state = controller.handle_event(SessionEvent::StartPressed).await;
        assert_eq!(state, InteractionState::Speaking);
        assert_eq!(calls_of(&calls).len(), before);
    }

    #[tokio::test]
    async fn test_stop_speaking_interrupts_playback() {
        let (mut controller, calls) =
            make_controller(TransportBehavior::Answer("a long answer".to_string()));

        controller.handle_event(SessionEvent::StartPressed).await;
        controller
            .handle_event(SessionEvent::TranscriptReady("hello".to_string()))
            .await;
        assert_eq!(controller.state(), InteractionState::Speaking);

        let state = controller.handle_event(SessionEvent::StopSpeakingPressed).await;
        assert_eq!(state, InteractionState::Idle);
        assert_eq!(calls_of(&calls).last().unwrap(), "output.cancel");
    }

    #[tokio::test]
    async fn test_new_cycle_clears_previous_session_data() {
        let (mut controller, _calls) =
            make_controller(TransportBehavior::Answer("first answer".to_string()));

        controller.handle_event(SessionEvent::StartPressed).await;
        controller
            .handle_event(SessionEvent::TranscriptReady("hello".to_string()))
            .await;
        controller.handle_event(SessionEvent::PlaybackFinished).await;
        assert!(controller.snapshot().answer.is_some());

        controller.handle_event(SessionEvent::StartPressed).await;
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, InteractionState::Listening);
        assert!(snapshot.transcript.is_none());
        assert!(snapshot.answer.is_none());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_silence_returns_to_idle() {
        let (mut controller, _calls) =
            make_controller(TransportBehavior::Answer("unused".to_string()));

        controller.handle_event(SessionEvent::StartPressed).await;
        let state = controller.handle_event(SessionEvent::CaptureEnded).await;
        assert_eq!(state, InteractionState::Idle);
        assert!(controller.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_stop_listening_cancels_capture() {
        let (mut controller, calls) =
            make_controller(TransportBehavior::Answer("unused".to_string()));

        controller.handle_event(SessionEvent::StartPressed).await;
        let state = controller
            .handle_event(SessionEvent::StopListeningPressed)
            .await;
        assert_eq!(state, InteractionState::Idle);
        assert_eq!(calls_of(&calls).last().unwrap(), "capture.stop");
    }
}
