use crate::{
    synth::{
        message::{MessageReceiver, ToneMessage, VoiceId},
        voice::Voice,
    },
    MAX_BLOCK_SIZE,
};

/// Enough for four drones, a fifth and a few overlapping plucks.
pub const MAX_VOICES: usize = 16;

/// Audio-thread side of the tone engine.
///
/// Drains control messages at the start of every block, then renders and
/// sums all sounding voices. Voices and scratch space are allocated up
/// front; `render_block` never allocates.
pub struct ToneMixer<R: MessageReceiver> {
    voices: Vec<Voice>,
    rx: R,
    temp_buffer: Vec<f32>,
    frame_counter: u64,
}

impl<R: MessageReceiver> ToneMixer<R> {
    pub fn new(sample_rate: f32, rx: R) -> Self {
        Self::with_voices(sample_rate, MAX_VOICES, rx)
    }

    pub fn with_voices(sample_rate: f32, max_voices: usize, rx: R) -> Self {
        let voices = (0..max_voices.max(1))
            .map(|_| Voice::new(sample_rate))
            .collect();

        Self {
            voices,
            rx,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
        }
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(msg) = self.rx.pop() {
            self.handle(msg);
        }

        out.fill(0.0);
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            for voice in self.voices.iter_mut().filter(|v| !v.is_free()) {
                let scratch = &mut self.temp_buffer[..chunk.len()];
                voice.render(scratch);

                for (o, v) in chunk.iter_mut().zip(scratch.iter()) {
                    *o += v;
                }
            }
        }

        self.frame_counter += out.len() as u64;
    }

    fn handle(&mut self, msg: ToneMessage) {
        match msg {
            ToneMessage::Start {
                id,
                frequency,
                shape,
            } => {
                let age = self.frame_counter;
                // with every voice held, the new tone is dropped
                if let Some(voice) = self.allocate_voice() {
                    voice.start(id, frequency, shape, age);
                }
            }
            ToneMessage::Release { id, tail } => {
                if let Some(voice) = self.find_voice(id) {
                    voice.release(tail);
                }
            }
            ToneMessage::Stop { id } => {
                if let Some(voice) = self.find_voice(id) {
                    voice.free();
                }
            }
            ToneMessage::StopAll => {
                for voice in &mut self.voices {
                    voice.free();
                }
            }
        }
    }

    /// Find a free voice, or steal the one closest to its hard stop.
    ///
    /// Held drones have no stop time and are never stolen: the engine still
    /// counts them as sounding until it releases them.
    fn allocate_voice(&mut self) -> Option<&mut Voice> {
        let idx = self.voices.iter().position(|v| v.is_free()).or_else(|| {
            self.voices
                .iter()
                .enumerate()
                .filter_map(|(idx, v)| v.remaining_samples().map(|left| (idx, left, v.age())))
                .min_by_key(|&(_, left, age)| (left, age))
                .map(|(idx, _, _)| idx)
        })?;

        Some(&mut self.voices[idx])
    }

    fn find_voice(&mut self, id: VoiceId) -> Option<&mut Voice> {
        self.voices.iter_mut().find(|v| v.id() == Some(id))
    }

    /// Number of voices currently producing sound.
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_free()).count()
    }

    /// Frequencies of the sounding voices, oldest first.
    pub fn sounding_frequencies(&self) -> Vec<f32> {
        let mut voices: Vec<_> = self.voices.iter().filter(|v| !v.is_free()).collect();
        voices.sort_by_key(|v| v.age());
        voices.iter().map(|v| v.frequency()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::shape::ToneShape;
    use rtrb::RingBuffer;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn start(id: u64, frequency: f32, shape: ToneShape) -> ToneMessage {
        ToneMessage::Start {
            id: VoiceId(id),
            frequency,
            shape,
        }
    }

    #[test]
    fn renders_silence_without_voices() {
        let (_tx, rx) = RingBuffer::<ToneMessage>::new(8);
        let mut mixer = ToneMixer::new(SAMPLE_RATE, rx);

        let mut buffer = vec![1.0f32; 256];
        mixer.render_block(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn stop_silences_only_the_named_voice() {
        let (mut tx, rx) = RingBuffer::<ToneMessage>::new(8);
        let mut mixer = ToneMixer::new(SAMPLE_RATE, rx);

        tx.push(start(1, 65.41, ToneShape::DRONE)).unwrap();
        tx.push(start(2, 98.0, ToneShape::DRONE)).unwrap();
        let mut buffer = vec![0.0f32; 256];
        mixer.render_block(&mut buffer);
        assert_eq!(mixer.active_voices(), 2);

        tx.push(ToneMessage::Stop { id: VoiceId(1) }).unwrap();
        mixer.render_block(&mut buffer);
        assert_eq!(mixer.sounding_frequencies(), vec![98.0]);

        // unknown ids are ignored
        tx.push(ToneMessage::Stop { id: VoiceId(42) }).unwrap();
        tx.push(ToneMessage::Release { id: VoiceId(42), tail: 1.0 }).unwrap();
        mixer.render_block(&mut buffer);
        assert_eq!(mixer.active_voices(), 1);
    }

    #[test]
    fn stop_all_frees_everything() {
        let (mut tx, rx) = RingBuffer::<ToneMessage>::new(8);
        let mut mixer = ToneMixer::new(SAMPLE_RATE, rx);

        tx.push(start(1, 110.0, ToneShape::FIFTH)).unwrap();
        tx.push(start(2, 165.0, ToneShape::FIFTH)).unwrap();
        let mut buffer = vec![0.0f32; 128];
        mixer.render_block(&mut buffer);

        tx.push(ToneMessage::StopAll).unwrap();
        mixer.render_block(&mut buffer);
        assert_eq!(mixer.active_voices(), 0);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn steals_oldest_voice_when_full() {
        let (mut tx, rx) = RingBuffer::<ToneMessage>::new(8);
        let mut mixer = ToneMixer::with_voices(SAMPLE_RATE, 2, rx);
        let mut buffer = vec![0.0f32; 64];

        tx.push(start(1, 65.41, ToneShape::PLUCK)).unwrap();
        mixer.render_block(&mut buffer);
        tx.push(start(2, 98.0, ToneShape::PLUCK)).unwrap();
        mixer.render_block(&mut buffer);
        tx.push(start(3, 146.83, ToneShape::PLUCK)).unwrap();
        mixer.render_block(&mut buffer);

        assert_eq!(mixer.sounding_frequencies(), vec![98.0, 146.83]);
    }

    #[test]
    fn held_drone_survives_a_burst_of_plucks() {
        let (mut tx, rx) = RingBuffer::<ToneMessage>::new(8);
        let mut mixer = ToneMixer::new(SAMPLE_RATE, rx);
        let mut buffer = vec![0.0f32; 64];

        tx.push(start(0, 65.41, ToneShape::DRONE)).unwrap();
        mixer.render_block(&mut buffer);
        tx.push(start(1, 98.0, ToneShape::FIFTH)).unwrap();
        tx.push(start(2, 147.0, ToneShape::FIFTH)).unwrap();
        mixer.render_block(&mut buffer);

        // one pluck per block, twice as many as there are voices
        for id in 3..3 + 2 * MAX_VOICES as u64 {
            tx.push(start(id, 220.0, ToneShape::PLUCK)).unwrap();
            mixer.render_block(&mut buffer);
        }

        let sounding = mixer.sounding_frequencies();
        assert_eq!(sounding.len(), MAX_VOICES);
        assert_eq!(&sounding[..3], &[65.41, 98.0, 147.0]);
    }

    #[test]
    fn new_tone_is_dropped_when_only_drones_sound() {
        let (mut tx, rx) = RingBuffer::<ToneMessage>::new(8);
        let mut mixer = ToneMixer::with_voices(SAMPLE_RATE, 2, rx);
        let mut buffer = vec![0.0f32; 64];

        tx.push(start(1, 65.41, ToneShape::DRONE)).unwrap();
        tx.push(start(2, 98.0, ToneShape::DRONE)).unwrap();
        mixer.render_block(&mut buffer);
        tx.push(start(3, 220.0, ToneShape::PLUCK)).unwrap();
        mixer.render_block(&mut buffer);

        assert_eq!(mixer.sounding_frequencies(), vec![65.41, 98.0]);

        // a released drone has a stop time again and can be reused
        tx.push(ToneMessage::Release { id: VoiceId(1), tail: 1.0 }).unwrap();
        tx.push(start(4, 220.0, ToneShape::PLUCK)).unwrap();
        mixer.render_block(&mut buffer);
        assert_eq!(mixer.sounding_frequencies(), vec![98.0, 220.0]);
    }

    #[test]
    fn handles_blocks_larger_than_scratch() {
        let (mut tx, rx) = RingBuffer::<ToneMessage>::new(8);
        let mut mixer = ToneMixer::new(SAMPLE_RATE, rx);

        tx.push(start(1, 220.0, ToneShape::DRONE)).unwrap();
        let mut buffer = vec![0.0f32; MAX_BLOCK_SIZE * 2 + 17];
        mixer.render_block(&mut buffer);

        assert!(buffer[MAX_BLOCK_SIZE * 2..].iter().any(|&s| s != 0.0));
    }
}
