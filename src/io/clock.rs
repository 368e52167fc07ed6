use std::{
    thread,
    time::{Duration, Instant},
};

/// Frame pacing for the control loop.
pub trait Clock {
    /// Block until the next frame boundary at `target_hz`.
    ///
    /// Returns the time since the previous tick.
    fn tick(&mut self, target_hz: u32) -> Duration;
}

/// Sleeps away whatever is left of each frame.
///
/// A frame that overruns is simply late; the next one is measured from when
/// the late tick returned, so missed frames are never made up.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }
}

/// Length of one frame at `hz`, treating zero as one.
pub fn frame_period(hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / hz.max(1) as f64)
}

impl Clock for FrameClock {
    fn tick(&mut self, target_hz: u32) -> Duration {
        if let Some(last) = self.last {
            let deadline = last + frame_period(target_hz);
            let now = Instant::now();
            if now < deadline {
                thread::sleep(deadline - now);
            }
        }

        let now = Instant::now();
        let elapsed = self.last.map_or(Duration::ZERO, |last| now - last);
        self.last = Some(now);
        elapsed
    }
}

/// Never sleeps; each tick pretends exactly one frame passed.
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { ticks: 0 }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Clock for ManualClock {
    fn tick(&mut self, target_hz: u32) -> Duration {
        self.ticks += 1;
        frame_period(target_hz)
    }
}
