#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Envelope and lifetime of a single reference tone.
///
/// All times are in seconds, counted from the moment the voice starts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneShape {
    /// Level reached at the end of the attack (0.0 - 1.0).
    pub peak: f32,
    /// Duration of the linear attack ramp.
    pub attack: f32,
    /// When the exponential release begins. `None` holds until released.
    pub release_at: Option<f32>,
    /// Time constant of the exponential release.
    pub release_time_constant: f32,
    /// Hard stop. `None` keeps the voice alive until it is released or stopped.
    pub stop_after: Option<f32>,
}

impl ToneShape {
    /// Short "listen" tone.
    pub const PLUCK: Self = Self {
        peak: 0.35,
        attack: 0.05,
        release_at: Some(0.6),
        release_time_constant: 0.25,
        stop_after: Some(2.0),
    };

    /// One note of the four-string sequence; same envelope as `PLUCK`, cut
    /// shorter so consecutive notes barely overlap.
    pub const SEQUENCE_NOTE: Self = Self {
        stop_after: Some(1.6),
        ..Self::PLUCK
    };

    /// Sustained drone, held until toggled off.
    pub const DRONE: Self = Self {
        peak: 0.23,
        attack: 0.3,
        release_at: None,
        release_time_constant: 0.25,
        stop_after: None,
    };

    /// Either voice of a fifth.
    pub const FIFTH: Self = Self {
        peak: 0.22,
        attack: 0.15,
        release_at: Some(2.4),
        release_time_constant: 0.4,
        stop_after: Some(4.0),
    };
}

/// Seconds a released drone keeps sounding before it is stopped.
pub const DRONE_RELEASE_TAIL: f32 = 1.0;
