use serde::Serialize;

/// Latest values reported by the wind sensor
///
/// Angles are degrees clockwise from north and may lie outside [0, 360).
/// Speed is in m/s and never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RawReading {
    pub heading: f32,
    pub wind_direction: f32,
    pub speed: f32,
}

impl RawReading {
    pub fn new(heading: f32, wind_direction: f32, speed: f32) -> Self {
        Self {
            heading,
            wind_direction,
            speed: speed.max(0.0),
        }
    }

    /// Overwrite the field carried by a single sensor event
    ///
    /// Non-finite values are dropped and the previous field value is kept.
    pub fn apply(&mut self, event: SensorEvent) {
        match event {
            SensorEvent::Heading(v) if v.is_finite() => self.heading = v,
            SensorEvent::WindDirection(v) if v.is_finite() => self.wind_direction = v,
            SensorEvent::Speed(v) if v.is_finite() => self.speed = v.max(0.0),
            other => log::debug!("Dropping non-finite sensor value: {:?}", other),
        }
    }

    /// Merge a full reading, keeping previous values for non-finite fields
    pub fn merge(&mut self, reading: RawReading) {
        self.apply(SensorEvent::Heading(reading.heading));
        self.apply(SensorEvent::WindDirection(reading.wind_direction));
        self.apply(SensorEvent::Speed(reading.speed));
    }
}

/// One value from a sensor that reports each quantity independently
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    Heading(f32),
    WindDirection(f32),
    Speed(f32),
}

/// Smoothed reading shown on the gauge
///
/// Starts at zero until the first frame after a sensor event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SmoothedReading {
    /// Device heading in degrees (unwrapped)
    pub heading: f32,
    /// Wind direction in degrees (unwrapped)
    pub wind_direction: f32,
    /// Wind speed in m/s
    pub speed: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_speed_clamped() {
        let reading = RawReading::new(0.0, 0.0, -3.0);
        assert_eq!(reading.speed, 0.0);

        let mut reading = RawReading::default();
        reading.apply(SensorEvent::Speed(-1.0));
        assert_eq!(reading.speed, 0.0);
    }

    #[test]
    fn test_event_overwrites_single_field() {
        let mut reading = RawReading::new(10.0, 20.0, 3.0);
        reading.apply(SensorEvent::WindDirection(400.0));
        assert_eq!(reading, RawReading::new(10.0, 400.0, 3.0));
    }

    #[test]
    fn test_non_finite_values_dropped() {
        let mut reading = RawReading::new(10.0, 20.0, 3.0);
        reading.merge(RawReading {
            heading: f32::NAN,
            wind_direction: 30.0,
            speed: f32::INFINITY,
        });
        assert_eq!(reading, RawReading::new(10.0, 30.0, 3.0));
    }
}
