//! Error types for keytone.

use thiserror::Error;

/// Error type for keytone operations.
///
/// Every variant is fatal at startup: there is no recovery path for an
/// unavailable output device or a malformed command line.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No default audio output device available")]
    NoOutputDevice,

    #[error("Output device does not support {requested} Hz")]
    UnsupportedSampleRate { requested: u32 },

    #[error("Unsupported device sample format: {0}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("Failed to query supported output configs")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("Failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for keytone operations.
pub type Result<T> = std::result::Result<T, Error>;
