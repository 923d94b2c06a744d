use thiserror::Error;

#[derive(Error, Debug)]
pub enum GaugeError {
    #[error("Invalid frame delta: {0} s (must be finite and non-negative)")]
    InvalidDeltaTime(f32),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sensor stream closed")]
    SensorClosed,
}

pub type Result<T> = std::result::Result<T, GaugeError>;
