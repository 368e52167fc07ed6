use std::{collections::HashMap, hash::Hash};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::synth::{held::HeldKeySet, message::MessageSender, voice::Voice};

/*
Sustain Envelope
================

Each mapped key moves through three states. Only the first two are tracked
here; once a fade-out has been handed to the mixer the engine forgets the key.

    ┌──────┐  key down   ┌────────────┐  key up    ┌──────────┐
    │ Idle │ ──────────→ │ Sustaining │ ─────────→ │ Released │ ──→ Idle
    └──────┘  vol = 1.0  └────────────┘  fadeOut   └──────────┘  (mixer)
                 play        │    ↑
                             └────┘ tick: vol -= step while vol > floor

The decay runs once per control tick, not per sample, so a held note sinks
from full volume to the floor over 128 ticks (~0.7 s at 180 Hz) and then holds
there for as long as the key stays down. A late tick only delays the decay; the
step size never grows to catch up.

    volume after N ticks = max(floor, 1.0 - N × step)
*/

/// Constants shaping the held-note envelope.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeConfig {
    /// Sustain plateau a held note decays to.
    pub decay_floor: f32,
    /// Volume removed per tick while above the floor.
    pub decay_step: f32,
    /// Release fade handed to the mixer on key up.
    pub fade_out_ms: u32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            decay_floor: 0.5,
            decay_step: 1.0 / 256.0,
            fade_out_ms: 200,
        }
    }
}

/// Per-key envelope state as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Not held; any sound is the tail of a fade the mixer owns.
    Idle,
    Sustaining,
}

/// Drives every voice's volume from key events and control ticks.
pub struct EnvelopeEngine<K, S: MessageSender> {
    voices: HashMap<K, Voice<S>>,
    held: HeldKeySet<K>,
    config: EnvelopeConfig,
}

impl<K, S> EnvelopeEngine<K, S>
where
    K: Eq + Hash + Copy + std::fmt::Debug,
    S: MessageSender,
{
    pub fn new(voices: HashMap<K, Voice<S>>, config: EnvelopeConfig) -> Self {
        Self {
            voices,
            held: HeldKeySet::new(),
            config,
        }
    }

    /// Idle -> Sustaining. Retriggers if the key is already held.
    ///
    /// Returns false for unmapped keys, which are ignored.
    pub fn key_down(&mut self, key: K) -> bool {
        let Some(voice) = self.voices.get_mut(&key) else {
            return false;
        };

        self.held.insert(key);
        voice.set_volume(1.0);
        voice.play(true);
        debug!(?key, "key down");
        true
    }

    /// Sustaining -> Released: issue the fade and stop tracking the key.
    ///
    /// Returns false for unmapped keys. A mapped key that was not held still
    /// gets a fade, since its voice may be sounding.
    pub fn key_up(&mut self, key: K) -> bool {
        let Some(voice) = self.voices.get_mut(&key) else {
            return false;
        };

        self.held.remove(&key);
        voice.fade_out(self.config.fade_out_ms);
        debug!(?key, fade_ms = self.config.fade_out_ms, "key up");
        true
    }

    /// Advance one frame: step every held voice toward the sustain floor.
    pub fn tick(&mut self) {
        let EnvelopeConfig {
            decay_floor,
            decay_step,
            ..
        } = self.config;

        for key in self.held.iter() {
            let Some(voice) = self.voices.get_mut(key) else {
                continue;
            };
            let volume = voice.volume();
            if volume > decay_floor {
                voice.set_volume((volume - decay_step).max(decay_floor));
            }
        }
    }

    /// Forget every held key without fading. Used when the loop quits.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn state(&self, key: &K) -> KeyState {
        if self.held.contains(key) {
            KeyState::Sustaining
        } else {
            KeyState::Idle
        }
    }

    pub fn is_held(&self, key: &K) -> bool {
        self.held.contains(key)
    }

    pub fn held(&self) -> &HeldKeySet<K> {
        &self.held
    }

    pub fn voice(&self, key: &K) -> Option<&Voice<S>> {
        self.voices.get(key)
    }

    pub fn voices(&self) -> impl Iterator<Item = (&K, &Voice<S>)> {
        self.voices.iter()
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }
}
