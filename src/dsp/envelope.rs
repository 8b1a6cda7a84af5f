use crate::{graph::node::RenderCtx, synth::shape::ToneShape, MIN_TIME};

/*
Gain Envelope Implementation
============================

Every reference tone is a sine wave multiplied by this envelope. It has
exactly two moving parts: a straight-line attack and a curved release.


The Shape
---------

  Level
   peak ┐    ______________
        │   ╱              ╲
        │  ╱                 ╲_
        │ ╱                     ╲__
    0.0 └╱──────────────────────────‾‾──→ Time
        Attack     Hold       Release
         (linear)             (exponential)

  Attack   linear ramp from 0 to `peak` over `attack` seconds.
  Hold     stay at `peak` until a release is requested.
  Release  glide toward zero with time constant `tau`.

A release is requested either by the shape itself (`release_at`, counted
from note-on) or from outside with `note_off`, which is how a sustained
drone ends.


The Math: Exponential Release
-----------------------------

The release follows

    level(t) = start * e^(-t / tau)

so after one time constant the level has fallen to ~37%, after three to
~5%. Per sample this is a single multiplication:

    coeff = e^(-1 / (tau * sample_rate))
    level = level * coeff

An exponential never reaches zero, so once the level drops below
SILENCE (-80 dB) we snap it to zero and go idle.


State Machine
-------------

    ┌──────┐ note_on ┌────────┐ level=peak ┌──────┐
    │ Idle │ ──────→ │ Attack │ ─────────→ │ Hold │
    └──────┘         └────────┘            └──────┘
        ↑                 │ release_at / note_off │
        │                 ↓                       ↓
        │   level<SILENCE ┌─────────┐             │
        └──────────────── │ Release │ ←───────────┘
                          └─────────┘

Release always starts from the CURRENT level, so releasing during the
attack does not click.
*/

/// Below this level the release is considered finished.
const SILENCE: f32 = 1.0e-4;

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Hold,
    Release,
}

pub struct Envelope {
    shape: ToneShape,

    stage: EnvelopeState,
    level: f32,

    // Samples since note_on, used to trigger the scheduled release
    elapsed_samples: u64,
    attack_samples: u64,
    release_at_samples: Option<u64>,

    release_coeff: f32,
}

impl Envelope {
    pub fn new(shape: ToneShape) -> Self {
        Self {
            shape,
            stage: EnvelopeState::Idle,
            level: 0.0,
            elapsed_samples: 0,
            attack_samples: 1,
            release_at_samples: None,
            release_coeff: 0.0,
        }
    }

    /// Replace the shape used by the next `note_on`.
    pub fn set_shape(&mut self, shape: ToneShape) {
        self.shape = shape;
    }

    /// Start the attack from silence.
    pub fn note_on(&mut self, ctx: &RenderCtx) {
        let sample_rate = ctx.sample_rate;

        self.level = 0.0;
        self.stage = EnvelopeState::Attack;
        self.elapsed_samples = 0;
        self.attack_samples = seconds_to_samples(self.shape.attack, sample_rate);
        self.release_at_samples = self
            .shape
            .release_at
            .map(|at| seconds_to_samples(at, sample_rate));

        let tau = self.shape.release_time_constant.max(MIN_TIME);
        self.release_coeff = (-1.0 / (tau * sample_rate)).exp();
    }

    /// Start the release from the current level.
    pub fn note_off(&mut self, _ctx: &RenderCtx) {
        if matches!(self.stage, EnvelopeState::Idle | EnvelopeState::Release) {
            return;
        }
        self.stage = EnvelopeState::Release;
    }

    /// Advance the envelope by one sample.
    pub fn next_sample(&mut self) {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
                return;
            }

            EnvelopeState::Attack => {
                let progress = (self.elapsed_samples + 1) as f32 / self.attack_samples as f32;
                self.level = self.shape.peak * progress.min(1.0);

                if self.elapsed_samples + 1 >= self.attack_samples {
                    self.level = self.shape.peak;
                    self.stage = EnvelopeState::Hold;
                }
            }

            EnvelopeState::Hold => {
                self.level = self.shape.peak;
            }

            EnvelopeState::Release => {
                self.level *= self.release_coeff;

                if self.level < SILENCE {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        self.elapsed_samples = self.elapsed_samples.saturating_add(1);

        if let Some(at) = self.release_at_samples {
            if self.elapsed_samples >= at
                && matches!(self.stage, EnvelopeState::Attack | EnvelopeState::Hold)
            {
                self.stage = EnvelopeState::Release;
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            self.next_sample();
            *sample = self.level;
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.elapsed_samples = 0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

fn seconds_to_samples(seconds: f32, sample_rate: f32) -> u64 {
    (seconds.max(MIN_TIME) * sample_rate).round().max(1.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(SAMPLE_RATE, 440.0)
    }

    fn render_samples(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    #[test]
    fn attack_ramps_linearly_to_peak() {
        let mut env = Envelope::new(ToneShape::PLUCK);
        env.note_on(&ctx());

        // 50ms attack at 1kHz = 50 samples; halfway should be half the peak
        render_samples(&mut env, 25);
        assert!((env.level() - 0.175).abs() < 0.01, "got {}", env.level());

        render_samples(&mut env, 25);
        assert!((env.level() - 0.35).abs() < 1e-6);
        assert_eq!(env.state(), EnvelopeState::Hold);
    }

    #[test]
    fn scheduled_release_starts_at_release_time() {
        let mut env = Envelope::new(ToneShape::PLUCK);
        env.note_on(&ctx());

        render_samples(&mut env, 599);
        assert_eq!(env.state(), EnvelopeState::Hold);

        render_samples(&mut env, 1);
        assert_eq!(env.state(), EnvelopeState::Release);

        // one time constant later the level is ~37% of the peak
        render_samples(&mut env, 250);
        let expected = 0.35 * (-1.0f32).exp();
        assert!((env.level() - expected).abs() < 0.005, "got {}", env.level());
    }

    #[test]
    fn drone_holds_until_note_off() {
        let mut env = Envelope::new(ToneShape::DRONE);
        env.note_on(&ctx());

        render_samples(&mut env, 10_000);
        assert_eq!(env.state(), EnvelopeState::Hold);
        assert!((env.level() - 0.23).abs() < 1e-6);

        env.note_off(&ctx());
        render_samples(&mut env, 5_000);
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn release_during_attack_starts_from_current_level() {
        let mut env = Envelope::new(ToneShape::DRONE);
        env.note_on(&ctx());

        // 300ms attack; release a third of the way in
        render_samples(&mut env, 100);
        let before = env.level();
        env.note_off(&ctx());
        render_samples(&mut env, 1);

        assert!(env.level() < before);
        assert!(env.level() > before * 0.9, "release must not jump");
    }

    #[test]
    fn note_off_while_idle_is_ignored() {
        let mut env = Envelope::new(ToneShape::DRONE);
        env.note_off(&ctx());
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert!(!env.is_active());
    }
}
