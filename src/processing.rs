use serde::Serialize;

use crate::config::GaugeConfig;
use crate::error::Result;
use crate::gauge::{CircularGauge, DrawCommand, Trail};
use crate::sensor::ReadingSlot;
use crate::session::{
    MeasurementSession, MeasurementState, MeasurementSummary, RawReading, SensorEvent,
    SessionStatistics, SmoothedReading,
};

/// Immutable view of one frame, for rendering and output
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameSnapshot {
    /// Frame counter, starting at 1 for the first tick
    pub frame: u64,
    /// Seconds of ticks since the session started
    pub time_secs: f32,
    pub state: MeasurementState,
    pub reading: SmoothedReading,
    pub raw: RawReading,
    /// Dial rotation in degrees (0 when locked to north)
    pub rotation_degrees: f32,
    pub lock_north: bool,
    /// Elapsed fraction of the current timed phase
    pub progress: f32,
}

/// Per-frame driver tying the session, the trail and the statistics together
///
/// All mutation happens in [`tick`](Self::tick). Rendering reads the state
/// through [`render`](Self::render) and never changes it.
pub struct MeasurementProcessor {
    session: MeasurementSession,
    trail: Trail,
    statistics: SessionStatistics,
    frame: u64,
    time_secs: f32,
}

impl MeasurementProcessor {
    pub fn new(config: &GaugeConfig) -> Self {
        Self {
            session: MeasurementSession::new(&config.session),
            trail: Trail::new(config.gauge.visible_samples),
            statistics: SessionStatistics::new(
                config.session.record_every_nth_frame,
                config.session.minimum_duration_secs,
            ),
            frame: 0,
            time_secs: 0.0,
        }
    }

    pub fn on_raw_reading(&mut self, reading: RawReading) {
        self.session.on_raw_reading(reading);
    }

    pub fn on_sensor_event(&mut self, event: SensorEvent) {
        self.session.on_sensor_event(event);
    }

    /// Advance one frame, pulling the latest reading from `slot` first
    pub fn tick_from_slot(&mut self, slot: &ReadingSlot, delta_secs: f32) -> Result<FrameSnapshot> {
        if let Some(reading) = slot.latest() {
            self.session.on_raw_reading(reading);
        }
        self.tick(delta_secs)
    }

    /// Advance one frame
    ///
    /// Invalid deltas are rejected and leave everything untouched. After the
    /// session has finished, ticks change nothing.
    pub fn tick(&mut self, delta_secs: f32) -> Result<FrameSnapshot> {
        self.session.tick(delta_secs)?;

        let state = self.session.current_state();
        if !state.is_finished() {
            self.frame += 1;
            self.time_secs += delta_secs;

            let reading = self.session.current_reading();
            self.trail.record(&reading);
            if state.is_measuring() {
                self.statistics
                    .record(self.session.measuring_secs(), &reading);
            }
        }

        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            time_secs: self.time_secs,
            state: self.session.current_state(),
            reading: self.session.current_reading(),
            raw: self.session.latest_raw(),
            rotation_degrees: self.session.rotation_degrees(),
            lock_north: self.session.lock_north(),
            progress: self.session.progress(),
        }
    }

    /// Draw the current state on `gauge`
    pub fn render(&self, gauge: &CircularGauge) -> Vec<DrawCommand> {
        gauge.render(
            &self.session.current_reading(),
            &self.trail,
            self.session.rotation_degrees(),
        )
    }

    pub fn set_lock_north(&mut self, locked: bool) {
        self.session.set_lock_north(locked);
    }

    /// External stop or cancel
    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn session(&self) -> &MeasurementSession {
        &self.session
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn is_finished(&self) -> bool {
        self.session.current_state().is_finished()
    }

    /// Stop the session, drop the trail and return the result
    pub fn finish(mut self) -> MeasurementSummary {
        self.session.stop();
        self.trail.clear();
        let summary = self.statistics.summarize(self.session.measuring_secs());
        log::info!(
            "Measurement finished: {:.1} s, mean {:.2} m/s, max {:.2} m/s, valid={}",
            summary.duration_secs,
            summary.mean_speed,
            summary.max_speed,
            summary.valid
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::Size;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tick_records_trail() {
        let mut processor = MeasurementProcessor::new(&GaugeConfig::default());
        processor.on_raw_reading(RawReading::new(0.0, 90.0, 10.0));
        for _ in 0..3 {
            processor.tick(0.1).unwrap();
        }
        assert_eq!(processor.trail().len(), 3);
        let latest = processor.trail().latest().unwrap();
        assert_abs_diff_eq!(latest.radius, 2.71, epsilon = 1e-4);
    }

    #[test]
    fn test_render_does_not_touch_trail() {
        let config = GaugeConfig::default();
        let mut processor = MeasurementProcessor::new(&config);
        processor.tick(0.1).unwrap();
        let gauge = CircularGauge::new(&config.gauge, Size::new(300.0, 300.0));
        let first = processor.render(&gauge);
        let second = processor.render(&gauge);
        assert_eq!(first, second);
        assert_eq!(processor.trail().len(), 1);
    }

    #[test]
    fn test_invalid_tick_leaves_frame_unchanged() {
        let mut processor = MeasurementProcessor::new(&GaugeConfig::default());
        processor.tick(0.1).unwrap();
        assert!(processor.tick(-1.0).is_err());
        assert_eq!(processor.snapshot().frame, 1);
        assert_eq!(processor.trail().len(), 1);
    }

    #[test]
    fn test_slot_feeds_session() {
        let slot = ReadingSlot::new();
        let mut processor = MeasurementProcessor::new(&GaugeConfig::default());
        slot.publish(RawReading::new(0.0, 0.0, 10.0));
        let snapshot = processor.tick_from_slot(&slot, 0.1).unwrap();
        assert_abs_diff_eq!(snapshot.reading.speed, 1.0, epsilon = 1e-5);
        assert_eq!(snapshot.raw.speed, 10.0);
    }

    #[test]
    fn test_finish_discards_trail_and_summarizes() {
        let mut config = GaugeConfig::default();
        config.session.stoppable = false;
        config.session.record_every_nth_frame = 1;
        let mut processor = MeasurementProcessor::new(&config);
        processor.on_raw_reading(RawReading::new(0.0, 45.0, 4.0));
        // 5 s countdown + 30 s cancellable + 5 s held at zero
        for _ in 0..400 {
            processor.tick(0.1).unwrap();
        }
        assert_eq!(
            processor.snapshot().state,
            MeasurementState::Cancellable { seconds_left: 0.0 }
        );

        let summary = processor.finish();
        assert!(summary.valid);
        assert!(summary.duration_secs >= 30.0);
        assert_abs_diff_eq!(summary.wind_direction.unwrap(), 45.0, epsilon = 0.5);
        assert!(summary.max_speed <= 4.0 + 1e-4);
    }
}
