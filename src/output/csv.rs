use super::{Formatter, FrameSnapshot, iso8601_timestamp};
use crate::smoothing::normalize_degrees;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, frame: &FrameSnapshot) -> String {
        format!(
            "{},{},{:.3},{},{:.2},{:.1},{:.1},{:.2},{:.1},{:.1},{}",
            iso8601_timestamp(),
            frame.frame,
            frame.time_secs,
            frame.state,
            frame.reading.speed,
            normalize_degrees(frame.reading.wind_direction),
            normalize_degrees(frame.reading.heading),
            frame.raw.speed,
            normalize_degrees(frame.raw.wind_direction),
            frame.rotation_degrees,
            frame.lock_north
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "ts,frame,time_secs,state,speed,wind_direction,heading,raw_speed,raw_wind_direction,rotation,lock_north",
        )
    }
}
