//! Piano - the control loop and the terminal application around it

use std::{collections::HashMap, fmt::Debug, hash::Hash, ops::ControlFlow};

use crossterm::event::KeyCode;
use ratatui::DefaultTerminal;
use rtrb::Producer;
use tracing::{debug, info};

use super::ui::{self, HeldNoteRow, StatusView};
use crate::{
    config::PianoConfig,
    dsp::generate,
    engine::{voice_channel, AudioDevice, Mixer},
    error::Result,
    io::{
        keyboard::{default_layout, key_label},
        Clock, FrameClock, InputEvent, InputSource, TerminalInput,
    },
    synth::{EnvelopeEngine, FrequencyTable, MessageSender, Voice, VoiceMessage},
};

/// Redraw the status view every this many control ticks (30 fps at 180 Hz).
const DRAW_INTERVAL: u64 = 6;

/// Generate one voice per mapped key and the mixer that renders them.
pub fn voice_bank<K>(frequencies: &FrequencyTable<K>, sample_rate: u32) -> (HashMap<K, Voice>, Mixer)
where
    K: Eq + Hash + Copy,
{
    let mut mixer = Mixer::new(sample_rate);
    let voices = frequencies
        .iter()
        .map(|(&key, frequency)| {
            let (voice, channel) = voice_channel(generate(frequency, sample_rate));
            mixer.add_channel(channel);
            (key, voice)
        })
        .collect();

    (voices, mixer)
}

/// A held key as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct HeldNote<K> {
    pub key: K,
    pub frequency: f64,
    pub volume: f32,
}

/// Single-threaded control loop owning every piece of mutable state.
///
/// Each frame: wait for the clock, apply pending key events, then step the
/// envelope of every held key once.
pub struct Piano<I, C, S = Producer<VoiceMessage>>
where
    I: InputSource,
    C: Clock,
    S: MessageSender,
{
    input: I,
    clock: C,
    frequencies: FrequencyTable<I::Key>,
    engine: EnvelopeEngine<I::Key, S>,
    tick_rate: u32,
    frames: u64,
}

impl<I, C, S> Piano<I, C, S>
where
    I: InputSource,
    I::Key: Eq + Hash + Copy + Debug,
    C: Clock,
    S: MessageSender,
{
    pub fn new(
        input: I,
        clock: C,
        frequencies: FrequencyTable<I::Key>,
        voices: HashMap<I::Key, Voice<S>>,
        config: &PianoConfig,
    ) -> Self {
        Self {
            input,
            clock,
            frequencies,
            engine: EnvelopeEngine::new(voices, config.envelope),
            tick_rate: config.tick_rate,
            frames: 0,
        }
    }

    /// Run one frame. Breaks once a quit event arrives.
    pub fn step(&mut self) -> Result<ControlFlow<()>> {
        self.clock.tick(self.tick_rate);

        for event in self.input.poll_events()? {
            match event {
                InputEvent::KeyDown(key) => {
                    self.engine.key_down(key);
                }
                InputEvent::KeyUp(key) => {
                    self.engine.key_up(key);
                }
                InputEvent::Quit => {
                    info!(frames = self.frames, "quit requested");
                    self.engine.release_all();
                    return Ok(ControlFlow::Break(()));
                }
            }
        }

        self.engine.tick();
        self.frames += 1;
        Ok(ControlFlow::Continue(()))
    }

    /// Loop until quit.
    pub fn run(&mut self) -> Result<()> {
        self.run_with(|_| Ok(()))
    }

    /// Loop until quit, calling `on_frame` after every completed frame.
    pub fn run_with<F>(&mut self, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&Self) -> Result<()>,
    {
        while self.step()?.is_continue() {
            on_frame(self)?;
        }
        Ok(())
    }

    /// Held keys, lowest pitch first.
    pub fn held_notes(&self) -> Vec<HeldNote<I::Key>> {
        let mut notes: Vec<_> = self
            .engine
            .held()
            .iter()
            .filter_map(|&key| {
                let frequency = self.frequencies.get(&key)?;
                let volume = self.engine.voice(&key)?.volume();
                Some(HeldNote {
                    key,
                    frequency,
                    volume,
                })
            })
            .collect();
        notes.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
        notes
    }

    pub fn engine(&self) -> &EnvelopeEngine<I::Key, S> {
        &self.engine
    }

    pub fn frequencies(&self) -> &FrequencyTable<I::Key> {
        &self.frequencies
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Completed frames so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }
}

/// Main application: default keyboard layout, terminal input and view.
pub struct Keytone {
    config: PianoConfig,
}

impl Keytone {
    pub fn new(config: PianoConfig) -> Self {
        Self { config }
    }

    /// Open the audio device, take over the terminal and play until quit.
    pub fn run(self) -> Result<()> {
        let frequencies = FrequencyTable::try_build(
            default_layout(),
            self.config.transpose,
            self.config.sample_rate,
        )?;
        let (voices, mixer) = voice_bank(&frequencies, self.config.sample_rate);
        debug!(keys = voices.len(), "voices generated");

        // Fails before the terminal is touched, so errors print normally.
        let device = AudioDevice::open(mixer)?;

        let mut terminal = ratatui::init();
        let result = self.play(&mut terminal, frequencies, voices, &device);
        ratatui::restore();

        info!("shut down");
        result
    }

    fn play(
        &self,
        terminal: &mut DefaultTerminal,
        frequencies: FrequencyTable<KeyCode>,
        voices: HashMap<KeyCode, Voice>,
        device: &AudioDevice,
    ) -> Result<()> {
        let input = TerminalInput::new()?;
        let mut piano = Piano::new(input, FrameClock::new(), frequencies, voices, &self.config);

        piano.run_with(|piano| {
            if piano.frames() % DRAW_INTERVAL == 1 {
                let view = self.status_view(piano, device);
                terminal.draw(|frame| ui::render(frame, &view))?;
            }
            Ok(())
        })
    }

    fn status_view<C: Clock>(&self, piano: &Piano<TerminalInput, C>, device: &AudioDevice) -> StatusView {
        StatusView {
            transpose: self.config.transpose,
            tick_rate: piano.tick_rate(),
            sample_rate: device.sample_rate(),
            channels: device.channels(),
            notes: piano
                .held_notes()
                .into_iter()
                .map(|note| HeldNoteRow {
                    label: key_label(note.key),
                    frequency: note.frequency,
                    volume: note.volume,
                })
                .collect(),
        }
    }
}
