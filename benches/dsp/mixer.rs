//! Benchmarks for the voice mixer.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keytone::{
    dsp::generate,
    engine::{voice_channel, Mixer},
    io::keyboard::default_layout,
    synth::{FrequencyTable, Voice},
};

use crate::BLOCK_SIZES;

fn full_keyboard() -> (Vec<Voice>, Mixer) {
    let table = FrequencyTable::build(default_layout(), 0);
    let mut mixer = Mixer::new(44_100);
    let voices = table
        .iter()
        .map(|(_, freq)| {
            let (voice, channel) = voice_channel(generate(freq, 44_100));
            mixer.add_channel(channel);
            voice
        })
        .collect();
    (voices, mixer)
}

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixer");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Nothing playing - draining empty rings only
        let (_voices, mut mixer) = full_keyboard();
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| mixer.render(black_box(&mut buffer)))
        });

        // Ten-finger chord held at the sustain plateau
        let (mut voices, mut mixer) = full_keyboard();
        for voice in voices.iter_mut().take(10) {
            voice.set_volume(0.5);
            voice.play(true);
        }
        group.bench_with_input(BenchmarkId::new("chord", size), &size, |b, _| {
            b.iter(|| mixer.render(black_box(&mut buffer)))
        });

        // Every key looping at once
        let (mut voices, mut mixer) = full_keyboard();
        for voice in voices.iter_mut() {
            voice.play(true);
        }
        group.bench_with_input(BenchmarkId::new("all_keys", size), &size, |b, _| {
            b.iter(|| mixer.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
