//! Background audio rendering.
//!
//! The control thread talks to this layer only through each voice's command
//! ring; the mixer itself is owned by the device callback.

pub mod mixer;
pub mod output;

pub use mixer::{voice_channel, Channel, Mixer};
pub use output::AudioDevice;
