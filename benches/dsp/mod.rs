//! Benchmarks for the signal path.

mod mixer;
mod tone;

pub use mixer::bench_mixer;
pub use tone::bench_tone;
