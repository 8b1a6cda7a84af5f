use std::f32::consts::TAU;

use crate::graph::node::RenderCtx;

/// Sine oscillator driven by a normalized phase accumulator.
///
/// Phase lives in `[0, 1)` and advances by `frequency / sample_rate` per
/// sample, so a frequency change between blocks never produces a jump in
/// the waveform.
pub struct OscillatorBlock {
    phase: f32,
}

impl OscillatorBlock {
    pub fn sine() -> Self {
        Self { phase: 0.0 }
    }

    /// Restart the waveform at phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let increment = ctx.frequency / ctx.sample_rate;

        for sample in out.iter_mut() {
            *sample = (TAU * self.phase).sin();

            self.phase += increment;
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
        }
    }
}

impl Default for OscillatorBlock {
    fn default() -> Self {
        Self::sine()
    }
}
