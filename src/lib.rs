//! Reference tones for tuning a cello by ear.
//!
//! The crate is layered bottom-up:
//!
//! - [`dsp`] and [`graph`]: sine oscillator and gain envelope, composed into
//!   voices.
//! - [`synth`]: preallocated voices and the [`synth::ToneMixer`] that runs
//!   on the audio thread, fed through a lock-free ring buffer.
//! - [`io`]: the default output device, opened lazily.
//! - [`engine`]: [`engine::ToneEngine`], which owns the tuning reference,
//!   the fifth mode and every sounding drone, fifth and sequence.
//! - [`binder`]: the presentation model the terminal UI renders.

pub mod binder;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph;
pub mod io;
pub mod synth;

pub use config::TunerConfig;
pub use error::TunerError;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
