use rtrb::Producer;
use tracing::warn;

use crate::{
    dsp::WaveformBuffer,
    synth::message::{MessageSender, VoiceMessage},
};

/// One playback channel bound to a single precomputed waveform.
///
/// The voice lives on the control thread. Every state change is mirrored
/// locally and forwarded to the mixer channel that renders it, so reading
/// state back never touches the audio thread.
pub struct Voice<S: MessageSender = Producer<VoiceMessage>> {
    waveform: WaveformBuffer,
    looping: bool,
    volume: f32,
    tx: S,
}

impl<S: MessageSender> Voice<S> {
    /// New voices are stopped at full volume.
    pub fn new(waveform: WaveformBuffer, tx: S) -> Self {
        Self {
            waveform,
            looping: false,
            volume: 1.0,
            tx,
        }
    }

    /// Start the waveform from the top. Volume is left untouched.
    pub fn play(&mut self, looping: bool) {
        self.looping = looping;
        self.send(VoiceMessage::Play { looping });
    }

    pub fn stop(&mut self) {
        self.looping = false;
        self.send(VoiceMessage::Stop);
    }

    /// Set the volume, clamped to `[0.0, 1.0]`. NaN is treated as silence.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volume = volume;
        self.send(VoiceMessage::SetVolume(volume));
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Hand a fade to silence over to the mixer; playback stops when it ends.
    ///
    /// The voice's own volume is not changed: the fade is applied on top of
    /// it by the audio thread, independent of the control loop.
    pub fn fade_out(&mut self, duration_ms: u32) {
        self.looping = false;
        self.send(VoiceMessage::FadeOut { duration_ms });
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn waveform(&self) -> &WaveformBuffer {
        &self.waveform
    }

    pub fn sender(&self) -> &S {
        &self.tx
    }

    fn send(&mut self, msg: VoiceMessage) {
        if !self.tx.push(msg) {
            warn!(?msg, "voice command ring full, dropping message");
        }
    }
}
