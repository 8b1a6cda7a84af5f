use rtrb::Producer;

use crate::{
    error::TunerError,
    synth::{ToneMessage, ToneShape, VoiceId},
};

/// Where the tone engine sends its voices.
///
/// `start_voice` is the only call that may need to bring the output up.
/// Releases and stops never open it, but they can still be refused when the
/// command queue is full; the caller is expected to retry them. Releasing or
/// stopping a voice that is unknown or already silent is a no-op.
pub trait AudioBackend {
    fn start_voice(&mut self, id: VoiceId, frequency: f32, shape: ToneShape)
        -> Result<(), TunerError>;

    /// Begin the release ramp, then stop the voice `tail` seconds later.
    fn release_voice(&mut self, id: VoiceId, tail: f32) -> Result<(), TunerError>;

    /// Silence the voice immediately.
    fn stop_voice(&mut self, id: VoiceId) -> Result<(), TunerError>;

    /// False once the output is known to be unusable.
    fn is_available(&self) -> bool {
        true
    }
}

/// A bare ring buffer producer feeds a `ToneMixer` directly; handy for
/// offline rendering.
impl AudioBackend for Producer<ToneMessage> {
    fn start_voice(
        &mut self,
        id: VoiceId,
        frequency: f32,
        shape: ToneShape,
    ) -> Result<(), TunerError> {
        self.push(ToneMessage::Start {
            id,
            frequency,
            shape,
        })
        .map_err(|_| TunerError::QueueFull)
    }

    fn release_voice(&mut self, id: VoiceId, tail: f32) -> Result<(), TunerError> {
        self.push(ToneMessage::Release { id, tail })
            .map_err(|_| TunerError::QueueFull)
    }

    fn stop_voice(&mut self, id: VoiceId) -> Result<(), TunerError> {
        self.push(ToneMessage::Stop { id })
            .map_err(|_| TunerError::QueueFull)
    }
}

/// One call observed by a `RecordingBackend`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackendCall {
    Start {
        id: VoiceId,
        frequency: f32,
        shape: ToneShape,
    },
    Release {
        id: VoiceId,
        tail: f32,
    },
    Stop {
        id: VoiceId,
    },
}

/// Test double that records every call instead of producing sound.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    unavailable: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose output can never be opened.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            unavailable: Some(reason.into()),
        }
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Frequencies of every started voice, in call order.
    pub fn started_frequencies(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::Start { frequency, .. } => Some(*frequency),
                _ => None,
            })
            .collect()
    }
}

impl AudioBackend for RecordingBackend {
    fn start_voice(
        &mut self,
        id: VoiceId,
        frequency: f32,
        shape: ToneShape,
    ) -> Result<(), TunerError> {
        if let Some(reason) = &self.unavailable {
            return Err(TunerError::Unavailable(reason.clone()));
        }
        self.calls.push(BackendCall::Start {
            id,
            frequency,
            shape,
        });
        Ok(())
    }

    fn release_voice(&mut self, id: VoiceId, tail: f32) -> Result<(), TunerError> {
        self.calls.push(BackendCall::Release { id, tail });
        Ok(())
    }

    fn stop_voice(&mut self, id: VoiceId) -> Result<(), TunerError> {
        self.calls.push(BackendCall::Stop { id });
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.unavailable.is_none()
    }
}
