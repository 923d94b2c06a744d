use rolling_stats::Stats;
use serde::Serialize;

use crate::smoothing::{circular_mean_degrees, normalize_degrees};

use super::reading::SmoothedReading;

/// A recorded point of the measurement series
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MeasurementPoint {
    /// Seconds since the measuring phase started
    pub time_secs: f32,
    /// Smoothed wind speed in m/s
    pub speed: f32,
    /// Smoothed wind direction in [0, 360)
    pub wind_direction: f32,
}

/// Result of a finished measurement
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementSummary {
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub duration_secs: f32,
    pub frames: usize,
    pub mean_speed: f32,
    pub max_speed: f32,
    pub min_speed: f32,
    pub speed_std_dev: f32,
    pub wind_direction: Option<f32>,
    /// True when the measuring phase lasted at least the configured minimum
    pub valid: bool,
    pub points: Vec<MeasurementPoint>,
}

/// Accumulates speed statistics and a thinned series during measurement
pub struct SessionStatistics {
    started_at: chrono::DateTime<chrono::Utc>,
    speed: Stats<f32>,
    points: Vec<MeasurementPoint>,
    record_every: usize,
    frames: usize,
    minimum_duration_secs: f32,
}

impl SessionStatistics {
    /// # Arguments
    /// * `record_every` - Keep one point of the series every N frames (0 keeps none)
    /// * `minimum_duration_secs` - Shortest measuring phase that counts as valid
    pub fn new(record_every: usize, minimum_duration_secs: f32) -> Self {
        Self {
            started_at: chrono::Utc::now(),
            speed: Stats::new(),
            points: Vec::new(),
            record_every,
            frames: 0,
            minimum_duration_secs,
        }
    }

    /// Add one measuring frame
    pub fn record(&mut self, time_secs: f32, reading: &SmoothedReading) {
        self.speed.update(reading.speed);
        if self.record_every > 0 && self.frames % self.record_every == 0 {
            self.points.push(MeasurementPoint {
                time_secs,
                speed: reading.speed,
                wind_direction: normalize_degrees(reading.wind_direction),
            });
        }
        self.frames += 1;
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn mean_speed(&self) -> Option<f32> {
        (self.speed.count > 0).then_some(self.speed.mean)
    }

    pub fn max_speed(&self) -> Option<f32> {
        (self.speed.count > 0).then_some(self.speed.max)
    }

    pub fn summarize(self, duration_secs: f32) -> MeasurementSummary {
        let has_data = self.speed.count > 0;
        let wind_direction = circular_mean_degrees(self.points.iter().map(|p| p.wind_direction));
        MeasurementSummary {
            started_at: self.started_at,
            duration_secs,
            frames: self.frames,
            mean_speed: if has_data { self.speed.mean } else { 0.0 },
            max_speed: if has_data { self.speed.max } else { 0.0 },
            min_speed: if has_data { self.speed.min } else { 0.0 },
            speed_std_dev: if has_data { self.speed.std_dev } else { 0.0 },
            wind_direction,
            valid: has_data && duration_secs >= self.minimum_duration_secs,
            points: self.points,
        }
    }
}
