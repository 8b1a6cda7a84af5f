use std::time::Duration;

use rtrb::RingBuffer;
use rustfft::{num_complex::Complex, FftPlanner};

use cello_tuner::{
    engine::{frequency_for, FifthMode, ManualClock, ToneEngine},
    synth::{ToneMessage, ToneMixer},
};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 256;

fn render(mixer: &mut ToneMixer<rtrb::Consumer<ToneMessage>>, samples: usize) -> Vec<f32> {
    let mut out = vec![0.0; samples];
    for chunk in out.chunks_mut(BLOCK) {
        mixer.render_block(chunk);
    }
    out
}

fn spectrum(samples: &[f32]) -> Vec<f32> {
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(samples.len());
    let mut buf: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buf);
    buf[..samples.len() / 2].iter().map(|c| c.norm()).collect()
}

/// Strongest bin between `lo` and `hi` Hz, as a frequency.
fn peak_between(mags: &[f32], n: usize, lo: f32, hi: f32) -> f32 {
    let bin_hz = SAMPLE_RATE / n as f32;
    let start = (lo / bin_hz) as usize;
    let end = ((hi / bin_hz) as usize).min(mags.len() - 1);
    let (bin, _) = mags[start..=end]
        .iter()
        .enumerate()
        .fold((0, 0.0f32), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
    (start + bin) as f32 * bin_hz
}

#[test]
fn renders_silence_without_voices() {
    let (_tx, rx) = RingBuffer::<ToneMessage>::new(16);
    let mut mixer = ToneMixer::new(SAMPLE_RATE, rx);
    let samples = render(&mut mixer, 4096);
    assert!(samples.iter().all(|&s| s == 0.0));
}

#[test]
fn pure_fifth_has_both_partials() {
    let (tx, rx) = RingBuffer::<ToneMessage>::new(64);
    let mut mixer = ToneMixer::new(SAMPLE_RATE, rx);
    let mut engine = ToneEngine::new(tx, ManualClock::new());

    // D3 - A3
    let (low, high) = engine.play_interval(2, 3, FifthMode::Pure).unwrap();
    assert!((low - frequency_for(50, 440.0)).abs() < 1e-3);

    // skip the attack
    let _ = render(&mut mixer, 9_600);
    let n = 16_384;
    let samples = render(&mut mixer, n);

    assert!(samples.iter().any(|s| s.abs() > 0.05));
    assert!(samples.iter().all(|s| s.abs() <= 1.0));

    let mags = spectrum(&samples);
    let bin_hz = SAMPLE_RATE / n as f32;
    let low_peak = peak_between(&mags, n, low * 0.8, low * 1.2);
    let high_peak = peak_between(&mags, n, high * 0.9, high * 1.1);
    assert!((low_peak - low).abs() <= 2.0 * bin_hz, "{low_peak} vs {low}");
    assert!((high_peak - high).abs() <= 2.0 * bin_hz, "{high_peak} vs {high}");
}

#[test]
fn stop_all_silences_drones_after_tail() {
    let (tx, rx) = RingBuffer::<ToneMessage>::new(64);
    let mut mixer = ToneMixer::new(SAMPLE_RATE, rx);
    let clock = ManualClock::new();
    let mut engine = ToneEngine::new(tx, clock.clone());

    let freq = frequency_for(43, 440.0);
    engine
        .toggle_sustain(cello_tuner::engine::StringId::G2, freq)
        .unwrap();
    let sounding = render(&mut mixer, 24_000);
    assert!(sounding.iter().any(|s| s.abs() > 0.1));

    engine.stop_all();
    clock.advance(Duration::from_millis(500));
    // one-second tail, then nothing
    let _ = render(&mut mixer, 48_000);
    let after = render(&mut mixer, 4_800);
    assert!(after.iter().all(|&s| s == 0.0));
    assert_eq!(mixer.active_voices(), 0);
}
