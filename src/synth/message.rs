#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rtrb::Consumer;

use crate::synth::shape::ToneShape;

/// Identifies one voice across the control/audio thread boundary.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "voice#{}", self.0)
    }
}

/// Commands sent from the control thread to the mixer.
///
/// Everything is `Copy` so pushing through the ring buffer never allocates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ToneMessage {
    /// Start a new sine voice.
    Start {
        id: VoiceId,
        frequency: f32,
        shape: ToneShape,
    },
    /// Begin the release ramp and stop the voice `tail` seconds later.
    Release { id: VoiceId, tail: f32 },
    /// Silence the voice immediately.
    Stop { id: VoiceId },
    /// Silence every voice immediately.
    StopAll,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ToneMessage>;
}

impl MessageReceiver for Consumer<ToneMessage> {
    fn pop(&mut self) -> Option<ToneMessage> {
        Consumer::pop(self).ok()
    }
}
