use super::{Formatter, FrameSnapshot};
use crate::smoothing::normalize_degrees;
use crate::units::{DirectionUnit, SpeedUnit};

pub struct TextFormatter {
    verbose: bool,
    speed_unit: SpeedUnit,
}

impl TextFormatter {
    pub fn new(verbose: bool, speed_unit: SpeedUnit) -> Self {
        Self {
            verbose,
            speed_unit,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, frame: &FrameSnapshot) -> String {
        let speed = self.speed_unit.format(frame.reading.speed);
        let direction = DirectionUnit::Cardinal.format(frame.reading.wind_direction);
        if self.verbose {
            format!(
                "[{:>7.2}s {:<9}] Wind: {:>5} {} from {:>3} ({:>5.1}°) heading: {:>5.1}°{} [raw: {:.1}° {:.2} m/s]",
                frame.time_secs,
                frame.state.to_string(),
                speed,
                self.speed_unit,
                direction,
                normalize_degrees(frame.reading.wind_direction),
                normalize_degrees(frame.reading.heading),
                if frame.lock_north { " (locked)" } else { "" },
                normalize_degrees(frame.raw.wind_direction),
                frame.raw.speed
            )
        } else {
            format!(
                "[{:<9}] Wind: {:>5} {} from {:>3} ({:>5.1}°)",
                frame.state.to_string(),
                speed,
                self.speed_unit,
                direction,
                normalize_degrees(frame.reading.wind_direction)
            )
        }
    }
}
