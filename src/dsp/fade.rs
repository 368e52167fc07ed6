//! Linear fade-out ramp advanced by the audio thread.

/// A gain ramp from its starting level down to zero.
///
/// The sample count is fixed when the fade begins, so the ramp lands on
/// exactly 0.0 regardless of block size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    start_level: f32,
    total_samples: u32,
    elapsed_samples: u32,
}

impl Fade {
    /// Fade from `start_level` to silence over `duration_ms` at `sample_rate`.
    pub fn new(start_level: f32, duration_ms: u32, sample_rate: u32) -> Self {
        Self {
            start_level: start_level.clamp(0.0, 1.0),
            total_samples: fade_samples(duration_ms, sample_rate),
            elapsed_samples: 0,
        }
    }

    /// Gain for the next sample, then advance.
    #[inline]
    pub fn next_gain(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }
        let progress = self.elapsed_samples as f32 / self.total_samples as f32;
        self.elapsed_samples += 1;
        (self.start_level * (1.0 - progress)).max(0.0)
    }

    /// Current gain without advancing.
    pub fn level(&self) -> f32 {
        if self.is_finished() {
            0.0
        } else {
            let progress = self.elapsed_samples as f32 / self.total_samples as f32;
            (self.start_level * (1.0 - progress)).max(0.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_samples >= self.total_samples
    }

    pub fn total_samples(&self) -> u32 {
        self.total_samples
    }
}

/// Number of samples a fade of `duration_ms` lasts, at least one.
pub fn fade_samples(duration_ms: u32, sample_rate: u32) -> u32 {
    let samples = (duration_ms as u64 * sample_rate as u64 + 500) / 1000;
    samples.clamp(1, u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn two_hundred_ms_at_cd_rate() {
        assert_eq!(fade_samples(200, 44_100), 8_820);
        assert_eq!(fade_samples(0, 44_100), 1);
    }

    #[test]
    fn ramp_is_linear_and_reaches_silence() {
        let mut fade = Fade::new(1.0, 1, 1_000);
        // one millisecond at 1 kHz is a single sample
        assert_eq!(fade.total_samples(), 1);
        assert_relative_eq!(fade.next_gain(), 1.0);
        assert!(fade.is_finished());
        assert_eq!(fade.next_gain(), 0.0);

        let mut fade = Fade::new(1.0, 4, 1_000);
        let gains: Vec<f32> = (0..5).map(|_| fade.next_gain()).collect();
        assert_eq!(gains, vec![1.0, 0.75, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn gain_never_increases() {
        let mut fade = Fade::new(0.8, 200, 44_100);
        let mut previous = fade.level();
        while !fade.is_finished() {
            let gain = fade.next_gain();
            assert!(gain <= previous);
            previous = gain;
        }
        assert_eq!(fade.level(), 0.0);
    }
}
