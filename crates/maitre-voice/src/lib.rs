//! Voice interaction controller for the Maitre kiosk.
//!
//! Owns the lifecycle of one interaction cycle (idle, listening, processing,
//! speaking) as an explicit state machine. The pure transition function
//! decides legality and emits effects to perform; the `VoiceController`
//! executes those effects against the speech capture, speech output, and
//! answer transport services, so the whole flow is testable without audio
//! hardware.

pub mod controller;
pub mod services;
pub mod state;

pub use controller::{transition, Effect, SessionEvent, SessionSnapshot, VoiceController};
pub use services::{
    AnswerTransport, NoopCapture, NoopOutput, SpeechCapture, SpeechOutput, SpeechParams,
};
pub use state::InteractionState;

/// Apology surfaced when the engine round trip fails or times out.
pub const TRANSPORT_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";
