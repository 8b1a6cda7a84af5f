//! Presentation model for the tuner's controls.
//!
//! `Binder` owns the `ToneEngine` and turns it into something a UI can draw:
//! the reference selector, one row per string, the interval buttons and the
//! transport. It holds no audio state of its own. Every label that depends
//! on what is sounding is read back from the engine when asked for, so the
//! screen cannot drift from the audio.

use crate::{
    config::TunerConfig,
    engine::{
        backend::AudioBackend,
        clock::Clock,
        pitch::FifthMode,
        strings::{IntervalDefinition, StringDefinition, StringId, CELLO_INTERVALS, CELLO_STRINGS},
        tone_engine::ToneEngine,
    },
    error::TunerError,
};

/// The one instrument on offer, shown as a decorative tab.
pub const INSTRUMENT_NAME: &str = "Cello";

pub const LISTEN_LABEL: &str = "Listen";
pub const HOLD_LABEL: &str = "Hold note";
pub const STOP_HOLD_LABEL: &str = "Stop note";

/// User actions, forwarded to the engine as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Short tone on the string in this row.
    Listen(usize),
    /// Start or stop the drone on the string in this row.
    ToggleHold(usize),
    /// Play the fifth at this index of the interval list.
    PlayInterval(usize),
    PlaySequence,
    StopAll,
    SelectReference(f32),
    SelectFifthMode(FifthMode),
}

impl Command {
    fn makes_sound(self) -> bool {
        matches!(
            self,
            Command::Listen(_)
                | Command::ToggleHold(_)
                | Command::PlayInterval(_)
                | Command::PlaySequence
        )
    }
}

/// One line of the string table.
#[derive(Debug, Clone, PartialEq)]
pub struct StringRow {
    pub string: &'static StringDefinition,
    pub frequency: f32,
}

impl StringRow {
    pub fn id(&self) -> StringId {
        self.string.id
    }

    pub fn frequency_text(&self) -> String {
        format_hz(self.frequency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceOption {
    pub frequency: f32,
    pub selected: bool,
}

impl ReferenceOption {
    pub fn label(&self) -> String {
        format!("A4 = {:.0}", self.frequency)
    }
}

pub fn format_hz(frequency: f32) -> String {
    format!("{frequency:.2} Hz")
}

pub struct Binder<B: AudioBackend, C: Clock> {
    engine: ToneEngine<B, C>,
    reference_choices: Vec<f32>,
    rows: Vec<StringRow>,
    notice: Option<String>,
    sound_enabled: bool,
}

impl<B: AudioBackend, C: Clock> Binder<B, C> {
    pub fn new(engine: ToneEngine<B, C>, config: &TunerConfig) -> Self {
        let mut binder = Self {
            sound_enabled: engine.is_audio_available(),
            engine,
            reference_choices: config.reference_choices.clone(),
            rows: Vec::with_capacity(CELLO_STRINGS.len()),
            notice: None,
        };
        binder.rebuild_rows();
        binder
    }

    /// Carry out one user action.
    ///
    /// Failures are absorbed here: they are logged and turned into the
    /// notice line. Losing the audio output disables the sound controls
    /// for the rest of the session.
    pub fn dispatch(&mut self, command: Command) {
        if command.makes_sound() && !self.sound_enabled {
            log::debug!("ignoring {command:?}: sound is disabled");
            return;
        }

        let result = match command {
            Command::Listen(row) => self
                .row(row)
                .map(|r| r.frequency)
                .and_then(|frequency| self.engine.play_short_tone(frequency).map(|_| ())),
            Command::ToggleHold(row) => self.row(row).map(|r| (r.id(), r.frequency)).and_then(
                |(id, frequency)| self.engine.toggle_sustain(id, frequency).map(|_| ()),
            ),
            Command::PlayInterval(index) => match CELLO_INTERVALS.get(index) {
                Some(interval) => {
                    let mode = self.engine.fifth_mode();
                    self.engine
                        .play_interval(interval.low, interval.high, mode)
                        .map(|_| ())
                }
                None => Err(TunerError::UnknownString(index)),
            },
            Command::PlaySequence => self.engine.play_sequence(),
            Command::StopAll => {
                self.engine.stop_all();
                Ok(())
            }
            Command::SelectReference(hz) => self.select_reference(hz),
            Command::SelectFifthMode(mode) => {
                self.engine.set_fifth_mode(mode);
                Ok(())
            }
        };

        if let Err(err) = result {
            self.report(err);
        }
    }

    /// Let the engine run its due timers.
    pub fn tick(&mut self) {
        if let Err(err) = self.engine.tick() {
            self.report(err);
        }
    }

    fn select_reference(&mut self, hz: f32) -> Result<(), TunerError> {
        self.engine.set_reference(hz)?;
        self.rebuild_rows();
        Ok(())
    }

    fn rebuild_rows(&mut self) {
        self.rows.clear();
        for string in &CELLO_STRINGS {
            self.rows.push(StringRow {
                string,
                frequency: self.engine.frequency_of(string),
            });
        }
    }

    fn row(&self, index: usize) -> Result<&StringRow, TunerError> {
        self.rows.get(index).ok_or(TunerError::UnknownString(index))
    }

    fn report(&mut self, err: TunerError) {
        if err.is_audio_unavailable() {
            if self.sound_enabled {
                log::error!("disabling sound controls: {err}");
            }
            self.sound_enabled = false;
        } else {
            log::warn!("{err}");
        }
        self.notice = Some(err.to_string());
    }

    // ── view state ──────────────────────────────────────────────────────

    pub fn rows(&self) -> &[StringRow] {
        &self.rows
    }

    pub fn intervals(&self) -> &'static [IntervalDefinition] {
        &CELLO_INTERVALS
    }

    pub fn is_held(&self, string: StringId) -> bool {
        self.engine.is_sustained(string)
    }

    pub fn hold_label(&self, string: StringId) -> &'static str {
        if self.is_held(string) {
            STOP_HOLD_LABEL
        } else {
            HOLD_LABEL
        }
    }

    pub fn reference_options(&self) -> Vec<ReferenceOption> {
        let current = self.engine.reference();
        self.reference_choices
            .iter()
            .map(|&frequency| ReferenceOption {
                frequency,
                selected: frequency == current,
            })
            .collect()
    }

    /// Position of the current reference among the choices, if it is one.
    pub fn selected_reference_index(&self) -> Option<usize> {
        let current = self.engine.reference();
        self.reference_choices.iter().position(|&f| f == current)
    }

    /// The choice `step` positions away from the current one, clamped to the ends.
    pub fn neighbour_reference(&self, step: isize) -> Option<f32> {
        let last = self.reference_choices.len().checked_sub(1)?;
        let idx = self.selected_reference_index().unwrap_or(0) as isize + step;
        Some(self.reference_choices[idx.clamp(0, last as isize) as usize])
    }

    pub fn reference_label(&self) -> String {
        format_hz(self.engine.reference())
    }

    pub fn fifth_mode(&self) -> FifthMode {
        self.engine.fifth_mode()
    }

    pub fn is_sequence_playing(&self) -> bool {
        self.engine.is_sequence_playing()
    }

    pub fn is_interval_sounding(&self) -> bool {
        self.engine.is_interval_sounding()
    }

    /// False once the audio output failed; the sound controls should be greyed out.
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn engine(&self) -> &ToneEngine<B, C> {
        &self.engine
    }
}
