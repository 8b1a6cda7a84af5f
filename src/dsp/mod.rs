//! Low-level DSP primitives used by the graph nodes.
//!
//! These components are allocation-free and realtime-safe, so voices can
//! embed them directly and render them from the audio callback.

/// Gain envelope: linear attack, hold, exponential release.
pub mod envelope;
/// Sine oscillator.
pub mod oscillator;

pub use envelope::EnvelopeState;
