//! Audio-thread side of the voices.
//!
//! The mixer owns one [`Channel`] per voice and is moved into the device
//! callback. It never allocates or locks while rendering.

use rtrb::{Consumer, RingBuffer};

use crate::{
    dsp::{Fade, WaveformBuffer},
    synth::{
        message::{MessageReceiver, VoiceMessage},
        voice::Voice,
    },
};

/// Commands a voice can queue between two audio callbacks.
pub const VOICE_RING_CAPACITY: usize = 64;

/// Full-scale value of an `i16` sample.
const I16_SCALE: f32 = 32_768.0;

/// Create a voice and the mixer channel that renders it.
pub fn voice_channel(waveform: WaveformBuffer) -> (Voice, Channel) {
    let (tx, rx) = RingBuffer::<VoiceMessage>::new(VOICE_RING_CAPACITY);
    let channel = Channel::new(waveform.clone(), rx);
    (Voice::new(waveform, tx), channel)
}

/// Playback state for one voice's waveform.
pub struct Channel<R: MessageReceiver = Consumer<VoiceMessage>> {
    waveform: WaveformBuffer,
    rx: R,
    position: usize,
    playing: bool,
    looping: bool,
    volume: f32,
    fade: Option<Fade>,
}

impl<R: MessageReceiver> Channel<R> {
    pub fn new(waveform: WaveformBuffer, rx: R) -> Self {
        Self {
            waveform,
            rx,
            position: 0,
            playing: false,
            looping: false,
            volume: 1.0,
            fade: None,
        }
    }

    /// Apply every queued command. Called once per block.
    fn drain_messages(&mut self, sample_rate: u32) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                VoiceMessage::Play { looping } => {
                    self.position = 0;
                    self.playing = true;
                    self.looping = looping;
                    self.fade = None;
                }
                VoiceMessage::Stop => {
                    self.playing = false;
                    self.fade = None;
                }
                VoiceMessage::SetVolume(volume) => {
                    self.volume = volume.clamp(0.0, 1.0);
                }
                VoiceMessage::FadeOut { duration_ms } => {
                    if self.playing {
                        let start = self.fade.map_or(1.0, |fade| fade.level());
                        self.fade = Some(Fade::new(start, duration_ms, sample_rate));
                    }
                }
            }
        }
    }

    /// Add this channel's output into `out`.
    fn mix_into(&mut self, out: &mut [f32]) {
        let samples = self.waveform.samples();

        for slot in out.iter_mut() {
            if !self.playing {
                break;
            }

            let gain = match self.fade.as_mut() {
                Some(fade) => fade.next_gain(),
                None => 1.0,
            };
            *slot += samples[self.position] as f32 / I16_SCALE * self.volume * gain;

            self.position += 1;
            if self.position >= samples.len() {
                self.position = 0;
                if !self.looping {
                    self.playing = false;
                }
            }

            if self.fade.is_some_and(|fade| fade.is_finished()) {
                self.playing = false;
                self.fade = None;
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

/// Sums every channel into one mono signal.
pub struct Mixer<R: MessageReceiver = Consumer<VoiceMessage>> {
    channels: Vec<Channel<R>>,
    sample_rate: u32,
}

impl<R: MessageReceiver> Mixer<R> {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            channels: Vec::new(),
            sample_rate,
        }
    }

    /// Register a channel. Only call before the mixer is handed to the device.
    pub fn add_channel(&mut self, channel: Channel<R>) {
        self.channels.push(channel);
    }

    /// Render one block of mono output, hard-clipped to `[-1.0, 1.0]`.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        for channel in &mut self.channels {
            channel.drain_messages(self.sample_rate);
            channel.mix_into(out);
        }

        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> &[Channel<R>] {
        &self.channels
    }

    pub fn active_channels(&self) -> usize {
        self.channels.iter().filter(|c| c.is_playing()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::generate;
    use approx::assert_relative_eq;

    const SR: u32 = 44_100;

    fn mixer_with_voice(freq: f64) -> (Mixer, Voice) {
        let (voice, channel) = voice_channel(generate(freq, SR));
        let mut mixer = Mixer::new(SR);
        mixer.add_channel(channel);
        (mixer, voice)
    }

    #[test]
    fn stopped_voices_render_silence() {
        let (mut mixer, _voice) = mixer_with_voice(440.0);
        let mut out = vec![1.0f32; 256];
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn looped_playback_repeats_the_period() {
        let (mut mixer, mut voice) = mixer_with_voice(441.0);
        voice.play(true);
        let mut out = vec![0.0f32; 300];
        mixer.render(&mut out);

        let expected = voice.waveform().samples()[25] as f32 / I16_SCALE;
        assert_relative_eq!(out[25], expected);
        assert_relative_eq!(out[125], expected);
        assert_relative_eq!(out[225], expected);
        assert_eq!(mixer.active_channels(), 1);
    }

    #[test]
    fn one_shot_stops_at_buffer_end() {
        let (mut mixer, mut voice) = mixer_with_voice(441.0);
        voice.play(false);
        let mut out = vec![0.0f32; 300];
        mixer.render(&mut out);
        assert!(out[100..].iter().all(|&s| s == 0.0));
        assert_eq!(mixer.active_channels(), 0);
    }

    #[test]
    fn volume_scales_output() {
        let (mut mixer, mut voice) = mixer_with_voice(441.0);
        voice.set_volume(0.5);
        voice.play(true);
        let mut out = vec![0.0f32; 100];
        mixer.render(&mut out);
        assert_relative_eq!(out[25], 4096.0 / I16_SCALE * 0.5);
    }

    #[test]
    fn fade_out_ends_playback() {
        let (mut mixer, mut voice) = mixer_with_voice(441.0);
        voice.play(true);
        let mut out = vec![0.0f32; 512];
        mixer.render(&mut out);

        voice.fade_out(10);
        // 10 ms at 44.1 kHz = 441 samples
        let mut block = vec![0.0f32; 256];
        mixer.render(&mut block);
        assert!(mixer.channels()[0].is_playing());
        assert!(mixer.channels()[0].is_fading());

        mixer.render(&mut out);
        assert_eq!(mixer.active_channels(), 0);
        assert!(out[185..].iter().all(|&s| s == 0.0));

        mixer.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn fade_completes_after_exact_sample_count() {
        let (mut mixer, mut voice) = mixer_with_voice(441.0);
        voice.play(true);
        voice.fade_out(10);
        let mut out = vec![0.0f32; 441];
        mixer.render(&mut out);
        assert_eq!(mixer.active_channels(), 0);
    }

    #[test]
    fn play_cancels_fade() {
        let (mut mixer, mut voice) = mixer_with_voice(441.0);
        voice.play(true);
        voice.fade_out(200);
        voice.play(true);
        let mut out = vec![0.0f32; 100];
        mixer.render(&mut out);
        assert!(!mixer.channels()[0].is_fading());
        assert_relative_eq!(out[25], 4096.0 / I16_SCALE);
    }

    #[test]
    fn fade_on_idle_channel_is_ignored() {
        let (mut mixer, mut voice) = mixer_with_voice(441.0);
        voice.fade_out(200);
        let mut out = vec![0.0f32; 64];
        mixer.render(&mut out);
        assert!(!mixer.channels()[0].is_fading());
    }

    #[test]
    fn sum_is_clipped() {
        let mut mixer = Mixer::new(SR);
        let mut voices = Vec::new();
        for _ in 0..16 {
            let (mut voice, channel) = voice_channel(generate(441.0, SR));
            voice.play(true);
            mixer.add_channel(channel);
            voices.push(voice);
        }
        let mut out = vec![0.0f32; 100];
        mixer.render(&mut out);
        assert_eq!(out[25], 1.0);
        assert_eq!(out[75], -1.0);
    }
}
