//! Low-level signal primitives.
//!
//! Nothing here allocates after construction, so both pieces are safe to use
//! from the audio callback.

/// Linear gain ramp used for device-side fade-outs.
pub mod fade;
/// Single-period sine table generation.
pub mod tone;

pub use fade::Fade;
pub use tone::{generate, WaveformBuffer};
