use serde::Serialize;

use super::{Formatter, FrameSnapshot, iso8601_timestamp};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonFrame<'a> {
    ts: String,
    #[serde(flatten)]
    frame: &'a FrameSnapshot,
}

impl Formatter for JsonFormatter {
    fn format(&self, frame: &FrameSnapshot) -> String {
        let line = JsonFrame {
            ts: iso8601_timestamp(),
            frame,
        };
        serde_json::to_string(&line).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}
