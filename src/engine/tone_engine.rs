use std::{collections::BTreeMap, time::Duration};

use crate::{
    config::{validate_reference, TunerConfig},
    engine::{
        backend::AudioBackend,
        clock::{Clock, SystemClock},
        pitch::{frequency_for, FifthMode},
        scheduler::{Scheduler, TimerHandle},
        strings::{string_at, StringDefinition, StringId, CELLO_STRINGS},
    },
    error::TunerError,
    synth::{shape::DRONE_RELEASE_TAIL, ToneMessage, ToneShape, VoiceId},
};

/// Time after which a fifth is forgotten; a little past its hard stop.
const INTERVAL_CLEAR_DELAY: Duration = Duration::from_millis(4_200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SustainState {
    On,
    Off,
}

impl SustainState {
    pub fn is_on(self) -> bool {
        self == SustainState::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TimerAction {
    SequenceNote { index: usize, frequency: f32 },
    SequenceFinished,
    IntervalFinished,
}

/// Everything the engine is currently responsible for silencing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ActiveVoices {
    sustained: BTreeMap<StringId, VoiceId>,
    interval: Vec<VoiceId>,
    interval_timer: Option<TimerHandle>,
    sequence_timers: Vec<TimerHandle>,
}

impl ActiveVoices {
    pub fn sustained_voice(&self, string: StringId) -> Option<VoiceId> {
        self.sustained.get(&string).copied()
    }

    /// The two voices of the sounding fifth, or nothing.
    pub fn interval(&self) -> &[VoiceId] {
        &self.interval
    }

    pub fn is_empty(&self) -> bool {
        self.sustained.is_empty()
            && self.interval.is_empty()
            && self.interval_timer.is_none()
            && self.sequence_timers.is_empty()
    }
}

/// Owns the tuning state and the lifecycle of every reference tone.
///
/// All methods run on one thread. Timed work (the later notes of a
/// sequence, forgetting a finished fifth) is queued in a `Scheduler` and
/// carried out by `tick`, which the caller runs from its event loop.
pub struct ToneEngine<B: AudioBackend, C: Clock = SystemClock> {
    backend: B,
    clock: C,
    reference: f32,
    fifth_mode: FifthMode,
    note_spacing: Duration,
    active: ActiveVoices,
    timers: Scheduler<TimerAction>,
    /// Releases and stops the backend could not take yet; retried by `tick`.
    deferred: Vec<ToneMessage>,
    next_voice: u64,
}

impl<B: AudioBackend, C: Clock> ToneEngine<B, C> {
    pub fn new(backend: B, clock: C) -> Self {
        let config = TunerConfig::default();
        Self {
            backend,
            clock,
            reference: config.reference,
            fifth_mode: config.fifth_mode,
            note_spacing: config.note_spacing,
            active: ActiveVoices::default(),
            timers: Scheduler::new(),
            deferred: Vec::new(),
            next_voice: 0,
        }
    }

    pub fn with_config(backend: B, clock: C, config: &TunerConfig) -> Result<Self, TunerError> {
        config.validate()?;
        let mut engine = Self::new(backend, clock);
        engine.reference = config.reference;
        engine.fifth_mode = config.fifth_mode;
        engine.note_spacing = config.note_spacing;
        Ok(engine)
    }

    // ── settings ────────────────────────────────────────────────────────

    pub fn reference(&self) -> f32 {
        self.reference
    }

    /// Change A4. Sounding tones keep their pitch; new tones use the new one.
    pub fn set_reference(&mut self, hz: f32) -> Result<(), TunerError> {
        validate_reference(hz)?;
        if hz != self.reference {
            log::info!("reference A4 {} Hz -> {} Hz", self.reference, hz);
            self.reference = hz;
        }
        Ok(())
    }

    pub fn fifth_mode(&self) -> FifthMode {
        self.fifth_mode
    }

    pub fn set_fifth_mode(&mut self, mode: FifthMode) {
        if mode != self.fifth_mode {
            log::info!("fifth mode {} -> {}", self.fifth_mode, mode);
            self.fifth_mode = mode;
        }
    }

    pub fn frequency_of(&self, string: &StringDefinition) -> f32 {
        frequency_for(string.pitch, self.reference)
    }

    // ── tones ───────────────────────────────────────────────────────────

    /// Fire-and-forget pluck; the voice ends by itself after two seconds.
    pub fn play_short_tone(&mut self, frequency: f32) -> Result<VoiceId, TunerError> {
        let id = self.start(frequency, ToneShape::PLUCK)?;
        log::debug!("short tone {frequency:.2} Hz ({id})");
        Ok(id)
    }

    /// Start a drone on `string` or release the one already sounding.
    pub fn toggle_sustain(
        &mut self,
        string: StringId,
        frequency: f32,
    ) -> Result<SustainState, TunerError> {
        if let Some(id) = self.active.sustained.remove(&string) {
            self.release(id, DRONE_RELEASE_TAIL);
            log::debug!("drone {string} off ({id})");
            return Ok(SustainState::Off);
        }

        let id = self.start(frequency, ToneShape::DRONE)?;
        self.active.sustained.insert(string, id);
        log::debug!("drone {string} on at {frequency:.2} Hz ({id})");
        Ok(SustainState::On)
    }

    /// Silence everything, then play the open strings low to high.
    ///
    /// The lowest string sounds at once; the others are timers that a later
    /// `stop_all` can still cancel.
    pub fn play_sequence(&mut self) -> Result<(), TunerError> {
        self.stop_all();

        let frequencies: Vec<f32> = CELLO_STRINGS
            .iter()
            .map(|string| self.frequency_of(string))
            .collect();

        self.start(frequencies[0], ToneShape::SEQUENCE_NOTE)?;

        let now = self.clock.now();
        let mut offset = Duration::ZERO;
        for (index, &frequency) in frequencies.iter().enumerate().skip(1) {
            offset = self.note_spacing * index as u32;
            let handle = self
                .timers
                .schedule(now + offset, TimerAction::SequenceNote { index, frequency });
            self.active.sequence_timers.push(handle);
        }

        let note_length = ToneShape::SEQUENCE_NOTE
            .stop_after
            .map(|secs| Duration::from_millis((secs * 1_000.0).round() as u64))
            .unwrap_or_default();
        let finished = self
            .timers
            .schedule(now + offset + note_length, TimerAction::SequenceFinished);
        self.active.sequence_timers.push(finished);

        log::debug!("sequence started at A4 = {} Hz", self.reference);
        Ok(())
    }

    /// Play the fifth between two strings, replacing any fifth already sounding.
    ///
    /// Returns the `(low, high)` frequencies actually played.
    pub fn play_interval(
        &mut self,
        low: usize,
        high: usize,
        mode: FifthMode,
    ) -> Result<(f32, f32), TunerError> {
        let low_string = string_at(low).ok_or(TunerError::UnknownString(low))?;
        let high_string = string_at(high).ok_or(TunerError::UnknownString(high))?;

        self.stop_interval();

        let (low_freq, high_freq) = mode.fifth(low_string.pitch, high_string.pitch, self.reference);

        let low_id = self.start(low_freq, ToneShape::FIFTH)?;
        let high_id = match self.start(high_freq, ToneShape::FIFTH) {
            Ok(id) => id,
            Err(err) => {
                self.stop(low_id);
                return Err(err);
            }
        };

        let timer = self.timers.schedule(
            self.clock.now() + INTERVAL_CLEAR_DELAY,
            TimerAction::IntervalFinished,
        );
        self.active.interval = vec![low_id, high_id];
        self.active.interval_timer = Some(timer);

        log::debug!(
            "{} fifth {}-{}: {low_freq:.2} Hz / {high_freq:.2} Hz",
            mode,
            low_string.id,
            high_string.id
        );
        Ok((low_freq, high_freq))
    }

    /// Cut the current fifth off immediately. Does nothing if none is sounding.
    pub fn stop_interval(&mut self) {
        for id in std::mem::take(&mut self.active.interval) {
            self.stop(id);
        }
        if let Some(timer) = self.active.interval_timer.take() {
            self.timers.cancel(timer);
        }
    }

    /// Release every drone, cut the fifth and cancel the pending sequence.
    pub fn stop_all(&mut self) {
        let sustained = std::mem::take(&mut self.active.sustained);
        for (string, id) in sustained {
            self.release(id, DRONE_RELEASE_TAIL);
            log::debug!("drone {string} off ({id})");
        }

        self.stop_interval();

        let cancelled = self.active.sequence_timers.len();
        for handle in self.active.sequence_timers.drain(..) {
            self.timers.cancel(handle);
        }
        if cancelled > 0 {
            log::debug!("cancelled {cancelled} pending sequence timers");
        }
    }

    /// Run every timer that is due. Call this regularly from the event loop.
    ///
    /// Deferred releases are retried first. A failing note does not stop
    /// later ones; the first error is returned.
    pub fn tick(&mut self) -> Result<(), TunerError> {
        self.flush_deferred();

        let now = self.clock.now();
        let mut first_error = None;

        while let Some((handle, action)) = self.timers.pop_due(now) {
            match action {
                TimerAction::SequenceNote { index, frequency } => {
                    self.active.sequence_timers.retain(|&h| h != handle);
                    match self.start(frequency, ToneShape::SEQUENCE_NOTE) {
                        Ok(id) => log::debug!("sequence note {index} at {frequency:.2} Hz ({id})"),
                        Err(err) => {
                            log::warn!("sequence note {index} failed: {err}");
                            first_error.get_or_insert(err);
                        }
                    }
                }
                TimerAction::SequenceFinished => {
                    self.active.sequence_timers.retain(|&h| h != handle);
                    log::debug!("sequence finished");
                }
                TimerAction::IntervalFinished => {
                    if self.active.interval_timer == Some(handle) {
                        // the voices already stopped themselves
                        self.active.interval.clear();
                        self.active.interval_timer = None;
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // ── queries ─────────────────────────────────────────────────────────

    pub fn is_sustained(&self, string: StringId) -> bool {
        self.active.sustained.contains_key(&string)
    }

    pub fn sustain_state(&self, string: StringId) -> SustainState {
        if self.is_sustained(string) {
            SustainState::On
        } else {
            SustainState::Off
        }
    }

    pub fn is_interval_sounding(&self) -> bool {
        !self.active.interval.is_empty()
    }

    pub fn is_sequence_playing(&self) -> bool {
        !self.active.sequence_timers.is_empty()
    }

    pub fn is_audio_available(&self) -> bool {
        self.backend.is_available()
    }

    pub fn active(&self) -> &ActiveVoices {
        &self.active
    }

    /// Number of timers still waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Releases and stops still waiting for room in the backend.
    pub fn pending_commands(&self) -> usize {
        self.deferred.len()
    }

    fn start(&mut self, frequency: f32, shape: ToneShape) -> Result<VoiceId, TunerError> {
        let id = VoiceId(self.next_voice);
        self.backend.start_voice(id, frequency, shape)?;
        self.next_voice += 1;
        Ok(id)
    }

    // The voice is already forgotten by `active`, so a dropped release
    // would leave it sounding with nothing able to stop it.
    fn release(&mut self, id: VoiceId, tail: f32) {
        if let Err(err) = self.backend.release_voice(id, tail) {
            log::warn!("release of {id} deferred: {err}");
            self.deferred.push(ToneMessage::Release { id, tail });
        }
    }

    fn stop(&mut self, id: VoiceId) {
        if let Err(err) = self.backend.stop_voice(id) {
            log::warn!("stop of {id} deferred: {err}");
            self.deferred.push(ToneMessage::Stop { id });
        }
    }

    fn flush_deferred(&mut self) {
        for msg in std::mem::take(&mut self.deferred) {
            let sent = match msg {
                ToneMessage::Release { id, tail } => self.backend.release_voice(id, tail),
                ToneMessage::Stop { id } => self.backend.stop_voice(id),
                ToneMessage::Start { .. } | ToneMessage::StopAll => Ok(()),
            };
            if sent.is_err() {
                self.deferred.push(msg);
            }
        }
    }
}
