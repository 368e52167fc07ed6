//! Startup configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    io::keyboard::default_layout,
    synth::{envelope::EnvelopeConfig, FrequencyTable},
};

/// Output sample rate (Hz) the voices are rendered at.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Nominal control loop rate (Hz).
pub const DEFAULT_TICK_RATE: u32 = 180;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PianoConfig {
    /// Half steps added to every key's offset.
    pub transpose: i32,
    pub sample_rate: u32,
    pub tick_rate: u32,
    pub envelope: EnvelopeConfig,
    /// Log at DEBUG instead of WARN.
    pub verbose: bool,
}

impl Default for PianoConfig {
    fn default() -> Self {
        Self {
            transpose: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            tick_rate: DEFAULT_TICK_RATE,
            envelope: EnvelopeConfig::default(),
            verbose: false,
        }
    }
}

impl PianoConfig {
    /// Parse command line arguments (without the program name).
    ///
    /// Accepts a bare integer transpose, `--transpose N` / `-t N` and
    /// `--verbose` / `-v`. The result is [validated](Self::validate).
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let arg = arg.as_ref();

            // Checked first so that "-3" is a transpose, not a flag.
            if let Ok(transpose) = arg.parse::<i32>() {
                config.transpose = transpose;
                continue;
            }

            match arg {
                "--transpose" | "-t" => {
                    let value = args
                        .next()
                        .ok_or_else(|| Error::InvalidConfig(format!("{arg} expects a value")))?;
                    config.transpose = parse_transpose(value.as_ref())?;
                }
                "--verbose" | "-v" => config.verbose = true,
                other => {
                    if let Some(value) = other.strip_prefix("--transpose=") {
                        config.transpose = parse_transpose(value)?;
                    } else {
                        return Err(Error::InvalidConfig(format!("unknown argument '{other}'")));
                    }
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every key of the default layout lands on a playable pitch.
    pub fn validate(&self) -> Result<()> {
        FrequencyTable::try_build(default_layout(), self.transpose, self.sample_rate).map(|_| ())
    }

    pub fn max_log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}

fn parse_transpose(value: &str) -> Result<i32> {
    value
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("transpose must be an integer, got '{value}'")))
}
