pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod gauge;
pub mod output;
pub mod processing;
pub mod sensor;
pub mod session;
pub mod smoothing;
pub mod units;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::GaugeConfig;
pub use error::{GaugeError, Result};
pub use processing::{FrameSnapshot, MeasurementProcessor};
