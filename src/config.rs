//! Configuration for the windgauge measurement core.
//!
//! Every section has a `Default` matching the handheld meter's stock
//! behavior, and the whole tree can be loaded from TOML. Missing keys fall
//! back to their defaults:
//!
//! ```
//! use windgauge::config::GaugeConfig;
//!
//! let config = GaugeConfig::from_toml_str(
//!     r#"
//!     [session]
//!     smoothing_weight = 0.2
//!
//!     [gauge]
//!     visible_samples = 60
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.gauge.visible_samples, 60);
//! assert_eq!(config.session.countdown_secs, 5.0);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{GaugeError, Result};
use crate::units::SpeedUnit;

/// Display refresh rate
///
/// Can be specified as either a frequency in Hz or a frame period in
/// milliseconds.
///
/// # Parsing formats
/// - `60` - frequency in Hz (no suffix)
/// - `60hz` or `60Hz` - frequency in Hz (explicit)
/// - `16.7ms` - frame period in milliseconds
///
/// # Example
/// ```
/// use windgauge::config::FrameRate;
///
/// let rate: FrameRate = "20ms".parse().unwrap();
/// assert!((rate.as_hz() - 50.0).abs() < 0.001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "FrameRateRepr")]
pub struct FrameRate(f32);

impl FrameRate {
    /// Create from frequency in Hz
    pub fn from_hz(hz: f32) -> Self {
        Self(hz)
    }

    /// Create from frame period in milliseconds
    pub fn from_period_ms(ms: f32) -> Self {
        Self(1000.0 / ms)
    }

    /// Get frequency in Hz
    pub fn as_hz(&self) -> f32 {
        self.0
    }

    /// Get frame period in seconds
    pub fn period_secs(&self) -> f32 {
        1.0 / self.0
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::from_hz(60.0)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}hz", self.0)
    }
}

impl FromStr for FrameRate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(num) = s.strip_suffix("ms") {
            let ms: f32 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid frame period: {}", s))?;
            if ms <= 0.0 || !ms.is_finite() {
                return Err("frame period must be positive".to_string());
            }
            return Ok(Self::from_period_ms(ms));
        }

        let num = s
            .strip_suffix("hz")
            .or_else(|| s.strip_suffix("Hz"))
            .or_else(|| s.strip_suffix("HZ"))
            .unwrap_or(s);

        let hz: f32 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid frame rate: {}", s))?;
        if hz <= 0.0 || !hz.is_finite() {
            return Err("frame rate must be positive".to_string());
        }
        Ok(Self::from_hz(hz))
    }
}

/// TOML accepts either a bare number (Hz) or a string with a suffix.
#[derive(Deserialize)]
#[serde(untagged)]
enum FrameRateRepr {
    Hz(f32),
    Text(String),
}

impl TryFrom<FrameRateRepr> for FrameRate {
    type Error = String;

    fn try_from(repr: FrameRateRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            FrameRateRepr::Hz(hz) if hz > 0.0 && hz.is_finite() => Ok(FrameRate::from_hz(hz)),
            FrameRateRepr::Hz(_) => Err("frame rate must be positive".to_string()),
            FrameRateRepr::Text(s) => s.parse(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    /// Countdown and smoothing parameters
    pub session: SessionConfig,
    /// Dial geometry and trail length
    pub gauge: DialConfig,
    /// Frame clock and output throttling
    pub clock: ClockConfig,
}

/// Measurement session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Exponential smoothing weight applied per frame, in (0, 1)
    pub smoothing_weight: f32,
    /// Length of the initial countdown in seconds
    pub countdown_secs: f32,
    /// Whether the countdown hands over to a user-stoppable measurement
    /// (true) or to a fixed-length cancellable one (false)
    pub stoppable: bool,
    /// Length of the cancellable phase in seconds
    pub cancellable_secs: f32,
    /// Minimum measured duration for a summary to count as valid
    pub minimum_duration_secs: f32,
    /// Keep one point of the measurement series every N frames
    pub record_every_nth_frame: usize,
    /// Start with the dial locked to north
    pub lock_north: bool,
}

/// Gauge geometry configuration
///
/// Lengths are in display points before `scale` is applied.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialConfig {
    /// Trail capacity; the oldest sample is evicted past this
    pub visible_samples: usize,
    /// Number of compass divisions; labels are drawn on every other one
    pub cardinal_directions: usize,
    /// Points per unit of wind speed when projecting trail samples
    pub radius_scale: f32,
    /// Distance from the dial edge to the compass labels
    pub label_inset: f32,
    /// Radius of a trail marker
    pub marker_radius: f32,
    /// Width of one background band
    pub band_width: f32,
    /// Extra darkness per background band (0-1)
    pub band_darkening: f32,
    /// Display scaling applied to band width and trail radius
    pub scale: f32,
    /// Unit used for the speed readout
    pub speed_unit: SpeedUnit,
}

/// Frame clock configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Display refresh rate driving `tick`
    pub frame_rate: FrameRate,
    /// Rate at which frames are printed by the CLI
    pub output_rate_hz: f32,
}

impl GaugeConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| GaugeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded configuration from {}", path.as_ref().display());
        Self::from_toml_str(&text)
    }

    /// Check that all parameters are usable
    pub fn validate(&self) -> Result<()> {
        let weight = self.session.smoothing_weight;
        if !(weight > 0.0 && weight < 1.0) {
            return Err(GaugeError::Config(format!(
                "smoothing_weight must be in (0, 1), got {}",
                weight
            )));
        }
        let durations_valid = self.session.countdown_secs >= 0.0
            && self.session.cancellable_secs >= 0.0
            && self.session.minimum_duration_secs >= 0.0;
        if !durations_valid {
            return Err(GaugeError::Config(
                "countdown durations must be non-negative".to_string(),
            ));
        }
        if self.gauge.visible_samples == 0 {
            return Err(GaugeError::Config(
                "visible_samples must be at least 1".to_string(),
            ));
        }
        if self.gauge.cardinal_directions == 0 {
            return Err(GaugeError::Config(
                "cardinal_directions must be at least 1".to_string(),
            ));
        }
        if self.clock.frame_rate.as_hz().is_nan() || self.clock.frame_rate.as_hz() <= 0.0 {
            return Err(GaugeError::Config("frame_rate must be positive".to_string()));
        }
        if self.clock.output_rate_hz.is_nan() || self.clock.output_rate_hz <= 0.0 {
            return Err(GaugeError::Config(
                "output_rate_hz must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            smoothing_weight: 0.1,
            countdown_secs: 5.0,
            stoppable: true,
            cancellable_secs: 30.0,
            minimum_duration_secs: 30.0,
            record_every_nth_frame: 10,
            lock_north: false,
        }
    }
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            visible_samples: 150,
            cardinal_directions: 16,
            radius_scale: 10.0,
            label_inset: 20.0,
            marker_radius: 3.0,
            band_width: 25.0,
            band_darkening: 0.02,
            scale: 1.0,
            speed_unit: SpeedUnit::MetersPerSecond,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::default(),
            output_rate_hz: 4.0,
        }
    }
}
