use rtrb::{Consumer, Producer};

/// Commands a [`Voice`](super::voice::Voice) sends to its mixer channel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceMessage {
    /// Restart from the first sample, cancelling any fade in progress.
    Play { looping: bool },
    Stop,
    SetVolume(f32),
    /// Ramp to silence over `duration_ms`, then stop.
    FadeOut { duration_ms: u32 },
}

/// Control-thread end of a voice's command channel.
pub trait MessageSender {
    /// Queue a message without blocking. Returns false if it was dropped.
    fn push(&mut self, msg: VoiceMessage) -> bool;
}

/// Audio-thread end of a voice's command channel.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceMessage>;
}

impl MessageSender for Producer<VoiceMessage> {
    fn push(&mut self, msg: VoiceMessage) -> bool {
        Producer::push(self, msg).is_ok()
    }
}

impl MessageReceiver for Consumer<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        Consumer::pop(self).ok()
    }
}

/// Records every message; lets tests and offline tools observe a voice.
impl MessageSender for Vec<VoiceMessage> {
    fn push(&mut self, msg: VoiceMessage) -> bool {
        Vec::push(self, msg);
        true
    }
}
