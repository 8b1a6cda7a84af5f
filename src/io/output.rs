//! Default-device audio output.
//!
//! The device is opened the first time a voice is started, not at startup,
//! so merely launching the tuner never grabs the sound card. A failed open
//! is remembered and reported on every later start without retrying.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat,
};
use rtrb::{Producer, RingBuffer};

use crate::{
    engine::backend::AudioBackend,
    error::TunerError,
    synth::{ToneMessage, ToneMixer, ToneShape, VoiceId},
    MAX_BLOCK_SIZE,
};

struct OpenOutput {
    // Dropping the stream closes the device
    _stream: cpal::Stream,
    tx: Producer<ToneMessage>,
}

enum OutputState {
    Closed,
    Open(OpenOutput),
    Unavailable(String),
}

pub struct CpalBackend {
    state: OutputState,
    queue_size: usize,
}

impl CpalBackend {
    pub fn new(queue_size: usize) -> Self {
        Self {
            state: OutputState::Closed,
            queue_size: queue_size.max(1),
        }
    }

    fn ensure_open(&mut self) -> Result<&mut Producer<ToneMessage>, TunerError> {
        if let OutputState::Unavailable(reason) = &self.state {
            return Err(TunerError::Unavailable(reason.clone()));
        }

        if let OutputState::Closed = self.state {
            match open_output(self.queue_size) {
                Ok(output) => self.state = OutputState::Open(output),
                Err(err) => {
                    log::error!("audio output unavailable: {err}");
                    self.state = OutputState::Unavailable(err.to_string());
                    return Err(err);
                }
            }
        }

        match &mut self.state {
            OutputState::Open(output) => Ok(&mut output.tx),
            OutputState::Unavailable(reason) => Err(TunerError::Unavailable(reason.clone())),
            OutputState::Closed => Err(TunerError::Unavailable("output not opened".into())),
        }
    }

    /// Producer of an already open output; stops never open the device.
    fn open_tx(&mut self) -> Option<&mut Producer<ToneMessage>> {
        match &mut self.state {
            OutputState::Open(output) => Some(&mut output.tx),
            _ => None,
        }
    }
}

impl AudioBackend for CpalBackend {
    fn start_voice(
        &mut self,
        id: VoiceId,
        frequency: f32,
        shape: ToneShape,
    ) -> Result<(), TunerError> {
        self.ensure_open()?.start_voice(id, frequency, shape)
    }

    fn release_voice(&mut self, id: VoiceId, tail: f32) -> Result<(), TunerError> {
        match self.open_tx() {
            Some(tx) => tx.release_voice(id, tail),
            None => Ok(()),
        }
    }

    fn stop_voice(&mut self, id: VoiceId) -> Result<(), TunerError> {
        match self.open_tx() {
            Some(tx) => tx.stop_voice(id),
            None => Ok(()),
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self.state, OutputState::Unavailable(_))
    }
}

impl Drop for CpalBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.open_tx() {
            let _ = tx.push(ToneMessage::StopAll);
        }
    }
}

fn open_output(queue_size: usize) -> Result<OpenOutput, TunerError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(TunerError::NoOutputDevice)?;
    let config = device.default_output_config()?;

    if config.sample_format() != SampleFormat::F32 {
        return Err(TunerError::UnsupportedFormat(config.sample_format()));
    }

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    log::info!(
        "opening output {} ({} Hz, {} channels)",
        device.name().unwrap_or_else(|_| "unknown device".into()),
        sample_rate,
        channels
    );

    let (tx, rx) = RingBuffer::<ToneMessage>::new(queue_size);

    let stream = device.build_output_stream(
        &config.into(),
        {
            let mut mixer = ToneMixer::new(sample_rate, rx);
            let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                    let block = &mut render_buf[..frames_to_render];
                    mixer.render_block(block);

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        let s = s.clamp(-1.0, 1.0);
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames_to_render;
                }
            }
        },
        |err| log::error!("audio stream error: {err}"),
        None,
    )?;

    stream.play()?;

    Ok(OpenOutput {
        _stream: stream,
        tx,
    })
}
