//! Interaction state machine with explicit transition legality.
//!
//! Valid transitions for the interaction lifecycle:
//! - Idle -> Listening (user starts a cycle)
//! - Listening -> Processing (final transcript captured)
//! - Processing -> Speaking (answer received, playback started)
//! - Speaking -> Idle (playback finished)
//! - Listening -> Idle (capture error, silence, or user stop)
//! - Processing -> Idle (transport error or timeout)
//! - Speaking -> Idle (user interrupts playback)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of the voice interaction controller. Phases are mutually
/// exclusive: capture, engine round trip, and playback never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionState {
    /// No interaction in progress. Ready to start.
    Idle,
    /// Capturing speech via the microphone.
    Listening,
    /// Waiting on the dialogue engine round trip.
    Processing,
    /// Playing the spoken answer.
    Speaking,
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionState::Idle => write!(f, "Idle"),
            InteractionState::Listening => write!(f, "Listening"),
            InteractionState::Processing => write!(f, "Processing"),
            InteractionState::Speaking => write!(f, "Speaking"),
        }
    }
}

impl InteractionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &InteractionState) -> bool {
        matches!(
            (self, target),
            (InteractionState::Idle, InteractionState::Listening)
                | (InteractionState::Listening, InteractionState::Processing)
                | (InteractionState::Processing, InteractionState::Speaking)
                | (InteractionState::Speaking, InteractionState::Idle)
                // Recovery and cancel transitions
                | (InteractionState::Listening, InteractionState::Idle)
                | (InteractionState::Processing, InteractionState::Idle)
        )
    }
}
