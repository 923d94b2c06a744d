//! Display units for wind speed and direction.
//!
//! All speeds inside the crate are meters per second and all directions
//! are degrees clockwise from north; conversion only happens at the edge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::FULL_TURN_DEGREES;

const CARDINAL_NAMES: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Upper bound of each Beaufort number in m/s (0 through 11; above is 12).
const BEAUFORT_LIMITS: [f32; 12] = [
    0.3, 1.6, 3.4, 5.5, 8.0, 10.8, 13.9, 17.2, 20.8, 24.5, 28.5, 32.7,
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SpeedUnit {
    #[default]
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Knots,
    Beaufort,
}

impl SpeedUnit {
    /// Convert a speed in m/s into this unit
    pub fn convert(&self, meters_per_second: f32) -> f32 {
        match self {
            SpeedUnit::MetersPerSecond => meters_per_second,
            SpeedUnit::KilometersPerHour => meters_per_second * 3.6,
            SpeedUnit::MilesPerHour => meters_per_second * 2.236_936,
            SpeedUnit::Knots => meters_per_second * 1.943_844,
            SpeedUnit::Beaufort => beaufort(meters_per_second) as f32,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SpeedUnit::MetersPerSecond => "m/s",
            SpeedUnit::KilometersPerHour => "km/h",
            SpeedUnit::MilesPerHour => "mph",
            SpeedUnit::Knots => "kn",
            SpeedUnit::Beaufort => "bft",
        }
    }

    /// Speed readout text, one decimal (Beaufort is integral)
    pub fn format(&self, meters_per_second: f32) -> String {
        match self {
            SpeedUnit::Beaufort => format!("{}", beaufort(meters_per_second)),
            _ => format!("{:.1}", self.convert(meters_per_second)),
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for SpeedUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m/s" | "ms" | "mps" | "meters-per-second" => Ok(SpeedUnit::MetersPerSecond),
            "km/h" | "kmh" | "kph" | "kilometers-per-hour" => Ok(SpeedUnit::KilometersPerHour),
            "mph" | "miles-per-hour" => Ok(SpeedUnit::MilesPerHour),
            "kn" | "kt" | "knots" => Ok(SpeedUnit::Knots),
            "bft" | "beaufort" => Ok(SpeedUnit::Beaufort),
            other => Err(format!("unknown speed unit: {}", other)),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionUnit {
    #[default]
    Cardinal,
    Degrees,
}

impl DirectionUnit {
    /// Direction readout text for an (unnormalized) angle in degrees
    pub fn format(&self, degrees: f32) -> String {
        match self {
            DirectionUnit::Degrees => {
                let normalized = degrees.rem_euclid(FULL_TURN_DEGREES);
                // rem_euclid can return exactly 360.0 for tiny negative inputs
                let rounded = normalized.round() as u32 % 360;
                format!("{}°", rounded)
            }
            DirectionUnit::Cardinal => cardinal_name(cardinal_index(degrees)).to_string(),
        }
    }
}

/// Beaufort number for a speed in m/s
pub fn beaufort(meters_per_second: f32) -> u8 {
    BEAUFORT_LIMITS
        .iter()
        .position(|&limit| meters_per_second < limit)
        .unwrap_or(BEAUFORT_LIMITS.len()) as u8
}

/// Name of a 16-point compass division. The index wraps, so `-1` is NNW.
pub fn cardinal_name(index: i32) -> &'static str {
    CARDINAL_NAMES[index.rem_euclid(CARDINAL_NAMES.len() as i32) as usize]
}

/// Nearest 16-point compass division for an angle in degrees
pub fn cardinal_index(degrees: f32) -> i32 {
    let step = FULL_TURN_DEGREES / CARDINAL_NAMES.len() as f32;
    ((degrees / step).round() as i32).rem_euclid(CARDINAL_NAMES.len() as i32)
}
