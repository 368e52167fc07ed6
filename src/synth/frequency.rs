//! Key to pitch mapping.

use std::{collections::HashMap, hash::Hash};

use crate::error::{Error, Result};

/// Concert A, the pitch of half-step offset zero.
pub const REFERENCE_FREQUENCY: f64 = 440.0;

/// Lowest pitch a playable key may be tuned to (Hz).
pub const MIN_FREQUENCY: f64 = 20.0;

/// Frequency of a note `half_steps` away from A440 (12-TET).
#[inline]
pub fn half_step_to_freq(half_steps: i64) -> f64 {
    REFERENCE_FREQUENCY * 2.0_f64.powf(half_steps as f64 / 12.0)
}

/// Immutable mapping from key to frequency in Hz.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    frequencies: HashMap<K, f64>,
    transpose: i32,
}

impl<K: Eq + Hash> FrequencyTable<K> {
    /// Build the table from `(key, half-step offset)` pairs.
    ///
    /// Several keys may share an offset. If the same key appears twice the
    /// later entry wins. Pitches are not range checked; see [`Self::try_build`].
    pub fn build<I>(mapping: I, transpose: i32) -> Self
    where
        I: IntoIterator<Item = (K, i32)>,
    {
        let frequencies = mapping
            .into_iter()
            .map(|(key, offset)| (key, half_step_to_freq(transpose as i64 + offset as i64)))
            .collect();

        Self {
            frequencies,
            transpose,
        }
    }

    /// Like [`Self::build`], but every pitch must lie between
    /// [`MIN_FREQUENCY`] and the Nyquist limit of `sample_rate`.
    pub fn try_build<I>(mapping: I, transpose: i32, sample_rate: u32) -> Result<Self>
    where
        I: IntoIterator<Item = (K, i32)>,
    {
        let table = Self::build(mapping, transpose);
        let nyquist = sample_rate as f64 / 2.0;

        let out_of_range = table
            .frequencies
            .values()
            .copied()
            .find(|freq| !(MIN_FREQUENCY..=nyquist).contains(freq));
        if let Some(freq) = out_of_range {
            return Err(Error::InvalidConfig(format!(
                "transpose {transpose} puts a key at {freq:.2} Hz, outside {MIN_FREQUENCY}..={nyquist} Hz"
            )));
        }

        Ok(table)
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.frequencies.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.frequencies.contains_key(key)
    }

    pub fn transpose(&self) -> i32 {
        self.transpose
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.frequencies.iter().map(|(key, freq)| (key, *freq))
    }
}
