use thiserror::Error;

/// Everything that can go wrong while producing reference tones.
///
/// The device variants all mean the same thing to a caller: sound output
/// is not available.
#[derive(Debug, Error)]
pub enum TunerError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("failed to query the output configuration: {0}")]
    OutputConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported output sample format {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to build the output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start the output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// Opening the output failed earlier; the reason is kept for display.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("audio command queue is full")]
    QueueFull,

    #[error("no string at index {0}")]
    UnknownString(usize),

    #[error("invalid reference frequency {0} Hz")]
    InvalidReference(f32),
}

impl TunerError {
    /// True for the errors that mean "no sound can be produced".
    pub fn is_audio_unavailable(&self) -> bool {
        matches!(
            self,
            TunerError::NoOutputDevice
                | TunerError::OutputConfig(_)
                | TunerError::UnsupportedFormat(_)
                | TunerError::BuildStream(_)
                | TunerError::PlayStream(_)
                | TunerError::Unavailable(_)
        )
    }
}

