//! Real-world scenario benchmarks.
//!
//! These model what the tuner actually asks of the audio thread.

mod mixer;

pub use mixer::bench_mixer;
