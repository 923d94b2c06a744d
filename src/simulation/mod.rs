mod wind;

pub use wind::{SyntheticWind, SyntheticWindConfig, generate_readings};
