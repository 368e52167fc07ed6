//! Runtime for playing the keyboard with a TUI.
//!
//! This module provides the [`Piano`] control loop and the [`Keytone`]
//! application that wires it to the audio device and the terminal.
//!
//! # Example
//!
//! ```ignore
//! use keytone::{config::PianoConfig, runtime::Keytone};
//!
//! fn main() -> color_eyre::Result<()> {
//!     Keytone::new(PianoConfig::default()).run()?;
//!     Ok(())
//! }
//! ```

mod app;
pub mod ui;

pub use app::{voice_bank, HeldNote, Keytone, Piano};
