//! Tuner settings with a builder-style API.
//!
//! ```ignore
//! let config = TunerConfig::new().reference(442.0).fifth_mode(FifthMode::Pure);
//! ```

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    engine::pitch::{FifthMode, DEFAULT_REFERENCE},
    error::TunerError,
};

/// Reference pitches offered for A4: baroque, "432", concert, and the two
/// common orchestral sharpenings.
pub const REFERENCE_CHOICES: [f32; 5] = [415.0, 432.0, 440.0, 442.0, 443.0];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TunerConfig {
    /// Initial frequency of A4 in Hz.
    pub reference: f32,
    /// Initial fifth mode.
    pub fifth_mode: FifthMode,
    /// Reference pitches the user can pick from.
    pub reference_choices: Vec<f32>,
    /// Gap between the notes of the four-string sequence.
    pub note_spacing: Duration,
    /// Capacity of the control-to-audio command queue.
    pub queue_size: usize,
}

impl TunerConfig {
    pub fn new() -> Self {
        Self {
            reference: DEFAULT_REFERENCE,
            fifth_mode: FifthMode::Tempered,
            reference_choices: REFERENCE_CHOICES.to_vec(),
            note_spacing: Duration::from_millis(900),
            queue_size: 64,
        }
    }

    pub fn reference(mut self, hz: f32) -> Self {
        self.reference = hz;
        self
    }

    pub fn fifth_mode(mut self, mode: FifthMode) -> Self {
        self.fifth_mode = mode;
        self
    }

    pub fn reference_choices(mut self, choices: impl Into<Vec<f32>>) -> Self {
        self.reference_choices = choices.into();
        self
    }

    pub fn note_spacing(mut self, spacing: Duration) -> Self {
        self.note_spacing = spacing;
        self
    }

    pub fn queue_size(mut self, size: usize) -> Self {
        self.queue_size = size;
        self
    }

    pub fn validate(&self) -> Result<(), TunerError> {
        validate_reference(self.reference)?;
        for &choice in &self.reference_choices {
            validate_reference(choice)?;
        }
        Ok(())
    }
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_reference(hz: f32) -> Result<(), TunerError> {
    if hz.is_finite() && hz > 0.0 {
        Ok(())
    } else {
        Err(TunerError::InvalidReference(hz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_concert_pitch() {
        let config = TunerConfig::default();
        assert_eq!(config.reference, 440.0);
        assert_eq!(config.fifth_mode, FifthMode::Tempered);
        assert!(config.reference_choices.contains(&config.reference));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_nonsense_references() {
        assert!(TunerConfig::new().reference(0.0).validate().is_err());
        assert!(TunerConfig::new().reference(f32::NAN).validate().is_err());
        assert!(TunerConfig::new()
            .reference_choices([440.0, -1.0])
            .validate()
            .is_err());
    }
}
