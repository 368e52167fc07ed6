// Purpose: key-driven voice control on the control thread.
// Everything here is single-threaded; the mixer only sees the messages.

pub mod envelope;
pub mod frequency;
pub mod held;
pub mod message;
pub mod voice;

pub use envelope::{EnvelopeConfig, EnvelopeEngine, KeyState};
pub use frequency::FrequencyTable;
pub use held::HeldKeySet;
pub use message::{MessageReceiver, MessageSender, VoiceMessage};
pub use voice::Voice;
