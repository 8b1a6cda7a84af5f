//! The tone engine: tuning state, voice bookkeeping and timers.
//!
//! `ToneEngine` decides *what* should sound and *when*; an `AudioBackend`
//! makes it sound. Timed work goes through a cancellable `Scheduler`
//! driven by `ToneEngine::tick`.

pub mod backend;
pub mod clock;
pub mod pitch;
pub mod scheduler;
pub mod strings;
pub mod tone_engine;

pub use backend::{AudioBackend, BackendCall, RecordingBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use pitch::{frequency_for, FifthMode};
pub use scheduler::{Scheduler, TimerHandle};
pub use strings::{IntervalDefinition, StringDefinition, StringId, CELLO_INTERVALS, CELLO_STRINGS};
pub use tone_engine::{ActiveVoices, SustainState, ToneEngine};
