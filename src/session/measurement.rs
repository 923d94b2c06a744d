use crate::config::SessionConfig;
use crate::error::{GaugeError, Result};
use crate::smoothing::{AngularSmoother, ExponentialSmoother};

use super::reading::{RawReading, SensorEvent, SmoothedReading};
use super::state::MeasurementState;

/// Live measurement: countdown state machine plus smoothed readings
///
/// Sensor input only overwrites the latest raw reading. All smoothing and
/// timer work happens in [`tick`](Self::tick), driven by the display clock,
/// so the sensor rate and the frame rate are independent.
pub struct MeasurementSession {
    state: MeasurementState,
    countdown_secs: f32,
    cancellable_secs: f32,
    latest: RawReading,
    heading: AngularSmoother,
    wind_direction: AngularSmoother,
    speed: ExponentialSmoother,
    lock_north: bool,
    elapsed_secs: f32,
    measuring_secs: f32,
}

impl MeasurementSession {
    pub fn new(config: &SessionConfig) -> Self {
        let weight = config.smoothing_weight;
        Self {
            state: MeasurementState::initial(config.countdown_secs, config.stoppable),
            countdown_secs: config.countdown_secs,
            cancellable_secs: config.cancellable_secs,
            latest: RawReading::default(),
            heading: AngularSmoother::new(weight),
            wind_direction: AngularSmoother::new(weight),
            speed: ExponentialSmoother::new(weight),
            lock_north: config.lock_north,
            elapsed_secs: 0.0,
            measuring_secs: 0.0,
        }
    }

    /// Store the most recent full sensor reading
    pub fn on_raw_reading(&mut self, reading: RawReading) {
        self.latest.merge(reading);
    }

    /// Store a single sensor quantity
    pub fn on_sensor_event(&mut self, event: SensorEvent) {
        self.latest.apply(event);
    }

    /// Advance the timer and the smoothed values by one frame
    ///
    /// Rejects negative or non-finite deltas without touching any state.
    /// Once the session is finished this is a no-op.
    pub fn tick(&mut self, delta_secs: f32) -> Result<()> {
        if !delta_secs.is_finite() || delta_secs < 0.0 {
            log::warn!("Ignoring tick with invalid delta {}", delta_secs);
            return Err(GaugeError::InvalidDeltaTime(delta_secs));
        }

        if self.state.is_finished() {
            return Ok(());
        }

        self.elapsed_secs += delta_secs;
        if self.state.is_measuring() {
            self.measuring_secs += delta_secs;
        }

        let previous = self.state;
        self.state = self.state.advance(delta_secs, self.cancellable_secs);
        if std::mem::discriminant(&previous) != std::mem::discriminant(&self.state) {
            log::info!("Measurement state: {:?} -> {:?}", previous, self.state);
        }

        let heading_target = if self.lock_north {
            0.0
        } else {
            self.latest.heading
        };
        self.heading.update(heading_target);
        self.wind_direction.update(self.latest.wind_direction);
        self.speed.update(self.latest.speed);

        log::trace!(
            "tick dt={:.4} state={} reading={:?}",
            delta_secs,
            self.state,
            self.current_reading()
        );

        Ok(())
    }

    /// External stop or cancel; ends the session from any state
    pub fn stop(&mut self) {
        if !self.state.is_finished() {
            log::info!("Measurement stopped in state {:?}", self.state);
            self.state = MeasurementState::Finished;
        }
    }

    pub fn current_state(&self) -> MeasurementState {
        self.state
    }

    pub fn current_reading(&self) -> SmoothedReading {
        SmoothedReading {
            heading: self.heading.value(),
            wind_direction: self.wind_direction.value(),
            speed: self.speed.value(),
        }
    }

    pub fn latest_raw(&self) -> RawReading {
        self.latest
    }

    /// Hold the dial at north instead of following the device heading
    ///
    /// While locked, heading input is still recorded but the smoothed
    /// heading is pulled towards 0, so releasing the lock resumes tracking
    /// from where the dial is without a jump in the smoothed value.
    pub fn set_lock_north(&mut self, locked: bool) {
        if self.lock_north != locked {
            log::info!("Lock north {}", if locked { "on" } else { "off" });
        }
        self.lock_north = locked;
    }

    pub fn lock_north(&self) -> bool {
        self.lock_north
    }

    /// Rotation to apply to the dial, in degrees
    pub fn rotation_degrees(&self) -> f32 {
        if self.lock_north {
            0.0
        } else {
            self.heading.value()
        }
    }

    /// Time spent ticking before the session finished, countdown included
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time spent in the measuring phases (after the countdown)
    pub fn measuring_secs(&self) -> f32 {
        self.measuring_secs
    }

    /// Elapsed fraction of the current timed phase, for the countdown ring
    pub fn progress(&self) -> f32 {
        let total = match self.state {
            MeasurementState::CountingDown { .. } => self.countdown_secs,
            _ => self.cancellable_secs,
        };
        self.state.progress(total)
    }
}
