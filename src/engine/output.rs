//! cpal output device.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, Sample, SampleFormat, SampleRate, SizedSample, Stream, StreamConfig,
    SupportedStreamConfig, SupportedStreamConfigRange,
};
use tracing::{error, info};

use crate::{
    engine::mixer::Mixer,
    error::{Error, Result},
    MAX_BLOCK_SIZE,
};

/// A running output stream fed by a [`Mixer`].
///
/// Audio stops when this is dropped.
pub struct AudioDevice {
    _stream: Stream,
    config: StreamConfig,
    sample_format: SampleFormat,
}

impl AudioDevice {
    /// Open the default output device at the mixer's sample rate and start it.
    pub fn open(mixer: Mixer) -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(Error::NoOutputDevice)?;

        let supported = choose_config(device.supported_output_configs()?, mixer.sample_rate())?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();

        let stream = match sample_format {
            SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer)?,
            SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer)?,
            other => return Err(Error::UnsupportedSampleFormat(other)),
        };
        stream.play()?;

        let name = device.name().unwrap_or_default();
        info!(
            device = %name,
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            format = %sample_format,
            "audio output started"
        );

        Ok(Self {
            _stream: stream,
            config,
            sample_format,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.sample_format
    }
}

fn build_stream<T>(device: &cpal::Device, config: &StreamConfig, mut mixer: Mixer) -> Result<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                let block = &mut mono[..chunk.len() / channels];
                mixer.render(block);

                // Copy to output (mono to all channels)
                for (frame, &sample) in chunk.chunks_mut(channels).zip(block.iter()) {
                    let value = T::from_sample(sample);
                    frame.fill(value);
                }
            }
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;

    Ok(stream)
}

/// Rank of a device sample format; lower is preferred.
fn format_rank(format: SampleFormat) -> Option<u8> {
    match format {
        SampleFormat::I16 => Some(0),
        SampleFormat::F32 => Some(1),
        SampleFormat::U16 => Some(2),
        _ => None,
    }
}

/// Pick a device config running at exactly `sample_rate`.
///
/// Prefers mono, then signed 16-bit, then the fewest channels.
pub fn choose_config<I>(ranges: I, sample_rate: u32) -> Result<SupportedStreamConfig>
where
    I: IntoIterator<Item = SupportedStreamConfigRange>,
{
    let rate = SampleRate(sample_rate);
    let at_rate: Vec<_> = ranges
        .into_iter()
        .filter(|range| range.min_sample_rate() <= rate && rate <= range.max_sample_rate())
        .collect();

    let Some(first) = at_rate.first() else {
        return Err(Error::UnsupportedSampleRate {
            requested: sample_rate,
        });
    };
    let fallback_format = first.sample_format();

    at_rate
        .into_iter()
        .filter_map(|range| {
            let rank = format_rank(range.sample_format())?;
            Some(((range.channels() != 1, rank, range.channels()), range))
        })
        .min_by_key(|(key, _)| *key)
        .map(|(_, range)| range.with_sample_rate(rate))
        .ok_or(Error::UnsupportedSampleFormat(fallback_format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpal::SupportedBufferSize;

    fn range(channels: u16, min: u32, max: u32, format: SampleFormat) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn prefers_mono_i16() {
        let ranges = vec![
            range(2, 8_000, 96_000, SampleFormat::F32),
            range(1, 8_000, 96_000, SampleFormat::F32),
            range(1, 8_000, 96_000, SampleFormat::I16),
        ];
        let config = choose_config(ranges, 44_100).unwrap();
        assert_eq!(config.channels(), 1);
        assert_eq!(config.sample_format(), SampleFormat::I16);
        assert_eq!(config.sample_rate(), SampleRate(44_100));
    }

    #[test]
    fn falls_back_to_stereo_float() {
        let ranges = vec![
            range(6, 44_100, 48_000, SampleFormat::F32),
            range(2, 44_100, 48_000, SampleFormat::F32),
        ];
        let config = choose_config(ranges, 44_100).unwrap();
        assert_eq!(config.channels(), 2);
        assert_eq!(config.sample_format(), SampleFormat::F32);
    }

    #[test]
    fn rejects_missing_rate() {
        let ranges = vec![range(2, 48_000, 48_000, SampleFormat::F32)];
        assert!(matches!(
            choose_config(ranges, 44_100),
            Err(Error::UnsupportedSampleRate { requested: 44_100 })
        ));
    }

    #[test]
    fn rejects_unusable_formats() {
        let ranges = vec![range(2, 44_100, 44_100, SampleFormat::I32)];
        assert!(matches!(
            choose_config(ranges, 44_100),
            Err(Error::UnsupportedSampleFormat(SampleFormat::I32))
        ));
    }
}
