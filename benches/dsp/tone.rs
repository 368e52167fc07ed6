//! Benchmarks for single-period sine tables.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keytone::{dsp::generate, io::keyboard::default_layout, synth::FrequencyTable};

pub fn bench_tone(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/tone");

    // Lowest key has the longest period
    for freq in [261.63, 440.0, 1_760.0] {
        group.bench_with_input(BenchmarkId::new("generate", freq), &freq, |b, &freq| {
            b.iter(|| generate(black_box(freq), black_box(44_100)))
        });
    }

    // Whole default layout, as done once at startup
    let table = FrequencyTable::build(default_layout(), 0);
    group.bench_function("layout", |b| {
        b.iter(|| {
            for (_, freq) in table.iter() {
                black_box(generate(freq, 44_100));
            }
        })
    });

    group.finish();
}
