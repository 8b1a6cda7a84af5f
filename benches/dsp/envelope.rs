//! Benchmarks for the tone envelope in each of its sounding stages.

use std::hint::black_box;

use cello_tuner::dsp::envelope::Envelope;
use cello_tuner::graph::node::RenderCtx;
use cello_tuner::synth::ToneShape;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::from_freq(48_000.0, 220.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (linear ramp)
        let mut env = Envelope::new(ToneShape::DRONE);
        env.note_on(&ctx);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Hold phase (flat)
        let mut env = Envelope::new(ToneShape::DRONE);
        env.note_on(&ctx);
        for _ in 0..48_000 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("hold", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Release phase (exponential decay)
        let mut env = Envelope::new(ToneShape::DRONE);
        env.note_on(&ctx);
        for _ in 0..48_000 {
            env.next_sample();
        }
        env.note_off(&ctx);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
