//! Pitch arithmetic: pitch numbers to frequencies, tempered and pure fifths.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pitch number that sounds at the reference frequency (A4).
pub const ANCHOR_PITCH: u8 = 69;

/// Concert pitch.
pub const DEFAULT_REFERENCE: f32 = 440.0;

/// Frequency ratio of a just (beatless) perfect fifth.
pub const PURE_FIFTH_RATIO: f32 = 1.5;

/// Convert a pitch number to Hz relative to the reference for A4.
///
/// Each semitone is a factor of 2^(1/12); 12 semitones double the frequency.
#[inline]
pub fn frequency_for(pitch: u8, reference: f32) -> f32 {
    reference * 2.0_f32.powf((pitch as f32 - ANCHOR_PITCH as f32) / 12.0)
}

/// How the upper note of a fifth is derived.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FifthMode {
    /// Both notes from the equal-tempered scale (7 semitones apart).
    #[default]
    Tempered,
    /// Upper note exactly 3:2 above the lower one.
    Pure,
}

impl FifthMode {
    pub fn toggled(self) -> Self {
        match self {
            FifthMode::Tempered => FifthMode::Pure,
            FifthMode::Pure => FifthMode::Tempered,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FifthMode::Tempered => "Tempered",
            FifthMode::Pure => "Pure",
        }
    }

    /// Frequencies `(low, high)` of the fifth between two pitches.
    pub fn fifth(self, low_pitch: u8, high_pitch: u8, reference: f32) -> (f32, f32) {
        let low = frequency_for(low_pitch, reference);
        let high = match self {
            FifthMode::Tempered => frequency_for(high_pitch, reference),
            FifthMode::Pure => low * PURE_FIFTH_RATIO,
        };
        (low, high)
    }
}

impl fmt::Display for FifthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
