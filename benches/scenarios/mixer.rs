//! Benchmarks for the mixer with typical tuning loads.

use std::hint::black_box;

use cello_tuner::engine::{frequency_for, CELLO_STRINGS};
use cello_tuner::synth::{ToneMessage, ToneMixer, ToneShape, VoiceId};
use criterion::{BenchmarkId, Criterion};
use rtrb::RingBuffer;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mixer");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === IDLE ===
        // nothing sounding: the cost of draining an empty queue
        let (_tx, rx) = RingBuffer::<ToneMessage>::new(64);
        let mut idle = ToneMixer::new(SAMPLE_RATE, rx);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                idle.render_block(black_box(&mut buffer));
            })
        });

        // === FOUR DRONES ===
        // every open string held at once
        let (mut tx, rx) = RingBuffer::<ToneMessage>::new(64);
        let mut drones = ToneMixer::new(SAMPLE_RATE, rx);
        for (i, string) in CELLO_STRINGS.iter().enumerate() {
            let _ = tx.push(ToneMessage::Start {
                id: VoiceId(i as u64),
                frequency: frequency_for(string.pitch, 440.0),
                shape: ToneShape::DRONE,
            });
        }
        group.bench_with_input(BenchmarkId::new("drones", size), &size, |b, _| {
            b.iter(|| {
                drones.render_block(black_box(&mut buffer));
            })
        });

        // === FULL LOAD ===
        // all sixteen voices busy; drones never end on their own
        let (mut tx, rx) = RingBuffer::<ToneMessage>::new(64);
        let mut full = ToneMixer::new(SAMPLE_RATE, rx);
        for i in 0..16u64 {
            let _ = tx.push(ToneMessage::Start {
                id: VoiceId(i),
                frequency: 65.41 * (1.0 + i as f32 * 0.25),
                shape: ToneShape::DRONE,
            });
        }
        group.bench_with_input(BenchmarkId::new("full", size), &size, |b, _| {
            b.iter(|| {
                full.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
