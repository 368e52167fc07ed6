pub mod config;
pub mod dsp; // Tone tables and fade ramps
pub mod engine; // Mixer and audio device
pub mod error;
pub mod io; // Key events and frame clock
pub mod runtime; // Control loop and terminal app
pub mod synth; // Voices and the sustain envelope

pub use error::{Error, Result};

/// Largest block the device callback renders in one pass.
pub const MAX_BLOCK_SIZE: usize = 2048;
