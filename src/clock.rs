use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::config::FrameRate;

/// Fixed-rate frame clock
///
/// Wraps a `crossbeam_channel::tick` subscription and reports the real time
/// between consecutive frames. Dropping the clock ends the subscription.
pub struct FrameClock {
    ticks: Receiver<Instant>,
    last: Instant,
    rate: FrameRate,
}

impl FrameClock {
    pub fn new(rate: FrameRate) -> Self {
        let period = Duration::from_secs_f32(rate.period_secs());
        Self {
            ticks: crossbeam_channel::tick(period),
            last: Instant::now(),
            rate,
        }
    }

    /// Frame delta in seconds for a tick received at `at`
    fn delta_for(&mut self, at: Instant) -> f32 {
        let delta = at.saturating_duration_since(self.last).as_secs_f32();
        self.last = at;
        delta
    }

    /// Block until the next frame and return its delta in seconds
    pub fn wait(&mut self) -> f32 {
        match self.ticks.recv() {
            Ok(at) => self.delta_for(at),
            // A tick channel never disconnects; fall back to the nominal period
            Err(_) => self.rate.period_secs(),
        }
    }
}
