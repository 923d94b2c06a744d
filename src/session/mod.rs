pub mod measurement;
pub mod reading;
pub mod state;
pub mod summary;

pub use measurement::MeasurementSession;
pub use reading::{RawReading, SensorEvent, SmoothedReading};
pub use state::MeasurementState;
pub use summary::{MeasurementPoint, MeasurementSummary, SessionStatistics};
