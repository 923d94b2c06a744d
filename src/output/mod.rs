mod csv;
mod json;
mod text;

use chrono::Utc;

use crate::processing::FrameSnapshot;
use crate::units::SpeedUnit;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

pub trait Formatter: Send {
    fn format(&self, frame: &FrameSnapshot) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(
    format: OutputFormat,
    verbose: bool,
    speed_unit: SpeedUnit,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose, speed_unit)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
