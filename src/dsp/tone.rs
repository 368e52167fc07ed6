//! Single-period sine tables.

/*
Single-Period Tone Tables
=========================

Each playable key owns one precomputed buffer holding exactly one period of a
sine wave. The mixer loops that buffer for as long as the key sounds, so the
oscillator never runs at audio rate on the control thread.


Vocabulary
----------

  period      Number of samples one cycle of the wave occupies:
                  N = floor(sample_rate / frequency)

  amplitude   Peak sample value. 4096 out of a possible 32767 leaves roughly
              18 dB of headroom so a handful of chords can be summed before
              the mixer has to clip.


The Math
--------

    sample[i] = round(amplitude × sin(2π · frequency · i / sample_rate))

for i in 0..N. Because N is truncated, the tail of the buffer stops short of a
full cycle and the looped tone sounds slightly sharp:

    A 440.00 Hz -> N = 100 -> 44100 / 100 = 441.0 Hz
    C 261.63 Hz -> N = 168 -> 44100 / 168 = 262.5 Hz

The error grows with pitch (a few cents in the middle of the keyboard). At
extreme frequencies N collapses to a single sample, which is silent but still
a valid buffer.
*/

use std::sync::Arc;

/// Peak sample value used by [`generate`].
pub const AMPLITUDE: f64 = 4096.0;

/// One period of a sine wave as signed 16-bit samples.
///
/// The sample storage is immutable after construction. Cloning is cheap and
/// hands the same read-only samples to the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformBuffer {
    samples: Arc<[i16]>,
    frequency: f64,
    sample_rate: u32,
}

impl WaveformBuffer {
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a buffer holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Frequency the buffer was generated for.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Pitch actually heard when the buffer is looped.
    pub fn looped_frequency(&self) -> f64 {
        self.sample_rate as f64 / self.samples.len() as f64
    }
}

/// Generate one period of a sine at `frequency` Hz with the default amplitude.
///
/// # Panics
///
/// Panics if `frequency` is not a positive finite number or `sample_rate`
/// is zero.
pub fn generate(frequency: f64, sample_rate: u32) -> WaveformBuffer {
    generate_with_amplitude(frequency, sample_rate, AMPLITUDE)
}

/// Like [`generate`] with a caller-chosen peak value.
///
/// Samples are clamped to the `i16` range, so amplitudes above 32767 square
/// off the wave instead of wrapping.
pub fn generate_with_amplitude(frequency: f64, sample_rate: u32, amplitude: f64) -> WaveformBuffer {
    assert!(
        frequency.is_finite() && frequency > 0.0,
        "tone frequency must be positive and finite, got {frequency}"
    );
    assert!(sample_rate > 0, "sample rate must be positive");

    let period = period_len(frequency, sample_rate);
    let step = std::f64::consts::TAU * frequency / sample_rate as f64;

    let samples: Arc<[i16]> = (0..period)
        .map(|i| {
            let value = (amplitude * (step * i as f64).sin()).round();
            value.clamp(i16::MIN as f64, i16::MAX as f64) as i16
        })
        .collect();

    WaveformBuffer {
        samples,
        frequency,
        sample_rate,
    }
}

/// floor(sample_rate / frequency), never less than one sample.
pub fn period_len(frequency: f64, sample_rate: u32) -> usize {
    ((sample_rate as f64 / frequency).floor() as usize).max(1)
}
