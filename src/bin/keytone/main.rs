//! keytone - play sine tones from the computer keyboard
//!
//! Run with: cargo run -- [transpose]

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use keytone::{config::PianoConfig, runtime::Keytone};

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let config =
        PianoConfig::from_args(std::env::args().skip(1)).wrap_err("failed to parse arguments")?;

    tracing_subscriber::fmt()
        .with_max_level(config.max_log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Keytone::new(config)
        .run()
        .wrap_err("keytone stopped with an error")
}
