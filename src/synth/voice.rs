use crate::graph::{
    amplify::Amplify,
    envelope::EnvNode,
    extensions::NodeExt,
    node::{GraphNode, RenderCtx},
    oscillator::OscNode,
};
use crate::synth::{message::VoiceId, shape::ToneShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Sounding: attack, hold or a scheduled release
    Releasing, // Released from outside, waiting for its stop time
}

type ToneGraph = Amplify<OscNode, EnvNode>;

/// A preallocated sine voice that can be restarted with any shape.
pub struct Voice {
    id: Option<VoiceId>,
    state: VoiceState,
    age: u64,
    sample_rate: f32,
    frequency: f32,
    graph: ToneGraph,
    elapsed_samples: u64,
    stop_at_samples: Option<u64>,
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            id: None,
            state: VoiceState::Free,
            age: 0,
            sample_rate,
            frequency: 0.0,
            graph: OscNode::sine().amplify(EnvNode::new(ToneShape::PLUCK)),
            elapsed_samples: 0,
            stop_at_samples: None,
        }
    }

    pub fn start(&mut self, id: VoiceId, frequency: f32, shape: ToneShape, age: u64) {
        self.id = Some(id);
        self.state = VoiceState::Active;
        self.age = age;
        self.frequency = frequency;
        self.elapsed_samples = 0;
        self.stop_at_samples = shape.stop_after.map(|s| self.seconds_to_samples(s));

        self.graph.modulator.set_shape(shape);
        let ctx = self.ctx();
        self.graph.note_on(&ctx);
    }

    /// Begin the release now and schedule a hard stop `tail` seconds later.
    pub fn release(&mut self, tail: f32) {
        if self.state != VoiceState::Active {
            return;
        }
        self.state = VoiceState::Releasing;

        let ctx = self.ctx();
        self.graph.note_off(&ctx);

        let stop_at = self.elapsed_samples + self.seconds_to_samples(tail);
        self.stop_at_samples = Some(match self.stop_at_samples {
            Some(existing) => existing.min(stop_at),
            None => stop_at,
        });
    }

    /// Render into `out`, overwriting it. Frees the voice once it is done.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.is_free() {
            out.fill(0.0);
            return;
        }

        let frames = match self.stop_at_samples {
            Some(stop_at) => (stop_at.saturating_sub(self.elapsed_samples) as usize).min(out.len()),
            None => out.len(),
        };

        let ctx = self.ctx();
        let (sounding, silent) = out.split_at_mut(frames);
        self.graph.render_block(sounding, &ctx);
        silent.fill(0.0);
        self.elapsed_samples += frames as u64;

        let reached_stop = self
            .stop_at_samples
            .is_some_and(|stop_at| self.elapsed_samples >= stop_at);
        if reached_stop || !self.graph.is_active() {
            self.free();
        }
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.id = None;
        self.graph.modulator.reset();
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn id(&self) -> Option<VoiceId> {
        self.id
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    /// Samples left before the hard stop. `None` for a drone that only ends
    /// when it is released.
    pub fn remaining_samples(&self) -> Option<u64> {
        self.stop_at_samples
            .map(|stop_at| stop_at.saturating_sub(self.elapsed_samples))
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    fn ctx(&self) -> RenderCtx {
        RenderCtx::from_freq(self.sample_rate, self.frequency)
    }

    fn seconds_to_samples(&self, seconds: f32) -> u64 {
        (seconds.max(0.0) * self.sample_rate).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    #[test]
    fn pluck_frees_itself_at_stop_time() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.start(VoiceId(1), 110.0, ToneShape::PLUCK, 0);

        let mut buffer = vec![0.0f32; 512];
        for _ in 0..3 {
            voice.render(&mut buffer);
        }
        assert_eq!(voice.state(), VoiceState::Active);

        // 2.0s = 2000 samples; the fourth block crosses it
        voice.render(&mut buffer);
        assert!(voice.is_free());
        assert!(buffer[2000 - 3 * 512..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn released_drone_stops_after_tail() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.start(VoiceId(7), 65.4, ToneShape::DRONE, 0);

        let mut buffer = vec![0.0f32; 500];
        voice.render(&mut buffer);
        voice.release(1.0);
        assert_eq!(voice.state(), VoiceState::Releasing);

        voice.render(&mut buffer);
        assert!(!voice.is_free());
        voice.render(&mut buffer);
        assert!(voice.is_free());
        assert_eq!(voice.id(), None);
    }

    #[test]
    fn only_drones_lack_a_stop_time() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.start(VoiceId(1), 110.0, ToneShape::DRONE, 0);
        assert_eq!(voice.remaining_samples(), None);

        voice.release(1.0);
        assert_eq!(voice.remaining_samples(), Some(1000));

        voice.start(VoiceId(2), 110.0, ToneShape::PLUCK, 0);
        let mut buffer = vec![0.0f32; 500];
        voice.render(&mut buffer);
        assert_eq!(voice.remaining_samples(), Some(1500));
    }

    #[test]
    fn release_of_free_voice_is_noop() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.release(1.0);
        assert!(voice.is_free());
    }
}
