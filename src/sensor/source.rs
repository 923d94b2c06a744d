use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::{GaugeError, Result};
use crate::session::RawReading;

/// A sensor reading stamped with its time since the source started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedReading {
    pub time_secs: f32,
    pub reading: RawReading,
}

/// Anything that produces wind readings
///
/// `Ok(None)` means the source is exhausted.
pub trait WindSource: Send {
    fn next_reading(&mut self) -> Result<Option<TimedReading>>;

    /// Wait at most `timeout` for the next reading
    ///
    /// Sources that can block indefinitely override this so a feed thread
    /// gets a chance to notice a stop request. The default never waits.
    fn poll_reading(&mut self, _timeout: Duration) -> Result<SourcePoll> {
        Ok(match self.next_reading()? {
            Some(timed) => SourcePoll::Ready(timed),
            None => SourcePoll::Exhausted,
        })
    }
}

/// Outcome of [`WindSource::poll_reading`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourcePoll {
    Ready(TimedReading),
    /// Nothing arrived within the timeout
    Pending,
    Exhausted,
}

/// Readings pushed from another thread, e.g. a hardware SDK callback
///
/// A live sensor has no natural end, so a dropped sender is reported as
/// [`GaugeError::SensorClosed`] rather than exhaustion.
pub struct ChannelSource {
    rx: Receiver<RawReading>,
    started: Instant,
}

impl ChannelSource {
    pub fn channel() -> (Sender<RawReading>, Self) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (
            tx,
            Self {
                rx,
                started: Instant::now(),
            },
        )
    }
}

impl ChannelSource {
    fn stamp(&self, reading: RawReading) -> TimedReading {
        TimedReading {
            time_secs: self.started.elapsed().as_secs_f32(),
            reading,
        }
    }
}

impl WindSource for ChannelSource {
    fn next_reading(&mut self) -> Result<Option<TimedReading>> {
        match self.rx.recv() {
            Ok(reading) => Ok(Some(self.stamp(reading))),
            Err(_) => Err(GaugeError::SensorClosed),
        }
    }

    fn poll_reading(&mut self, timeout: Duration) -> Result<SourcePoll> {
        match self.rx.recv_timeout(timeout) {
            Ok(reading) => Ok(SourcePoll::Ready(self.stamp(reading))),
            Err(RecvTimeoutError::Timeout) => Ok(SourcePoll::Pending),
            Err(RecvTimeoutError::Disconnected) => Err(GaugeError::SensorClosed),
        }
    }
}

/// Recorded readings replayed from a text file
///
/// One reading per line: `heading,wind_direction,speed[,time_secs]`.
/// Blank lines, `#` comments and a header line are skipped. Lines without
/// a time are spaced `interval_secs` after the previous reading.
pub struct ReplaySource {
    readings: Vec<TimedReading>,
    position: usize,
}

impl ReplaySource {
    pub fn open<P: AsRef<Path>>(path: P, interval_secs: f32) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let source = Self::from_reader(BufReader::new(file), interval_secs)?;
        log::info!(
            "Loaded {} readings from {}",
            source.len(),
            path.as_ref().display()
        );
        Ok(source)
    }

    pub fn from_reader<R: BufRead>(reader: R, interval_secs: f32) -> Result<Self> {
        let mut readings = Vec::new();
        let mut next_time = 0.0_f32;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if readings.is_empty() && trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
                log::debug!("Skipping header line: {}", trimmed);
                continue;
            }

            let timed = parse_line(trimmed, next_time).map_err(|message| GaugeError::Parse {
                line: line_number,
                message,
            })?;
            next_time = timed.time_secs + interval_secs;
            readings.push(timed);
        }

        Ok(Self {
            readings,
            position: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

fn parse_line(line: &str, default_time: f32) -> std::result::Result<TimedReading, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 3 || fields.len() > 4 {
        return Err(format!("expected 3 or 4 fields, got {}", fields.len()));
    }

    let parse = |name: &str, text: &str| -> std::result::Result<f32, String> {
        let value: f32 = text
            .parse()
            .map_err(|_| format!("invalid {}: {:?}", name, text))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("{} must be finite", name))
        }
    };

    let heading = parse("heading", fields[0])?;
    let wind_direction = parse("wind direction", fields[1])?;
    let speed = parse("speed", fields[2])?;
    let time_secs = match fields.get(3) {
        Some(t) => parse("time", t)?,
        None => default_time,
    };
    if Duration::try_from_secs_f32(time_secs.max(0.0)).is_err() {
        return Err(format!("time out of range: {}", time_secs));
    }

    Ok(TimedReading {
        time_secs,
        reading: RawReading::new(heading, wind_direction, speed),
    })
}

impl WindSource for ReplaySource {
    fn next_reading(&mut self) -> Result<Option<TimedReading>> {
        let next = self.readings.get(self.position).copied();
        if next.is_some() {
            self.position += 1;
        }
        Ok(next)
    }
}
