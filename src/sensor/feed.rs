use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use super::slot::ReadingSlot;
use super::source::{SourcePoll, WindSource};

/// Longest single wait on the source or the clock, so a stop request is
/// noticed promptly
const MAX_SLEEP: Duration = Duration::from_millis(50);

/// Marks the feed exhausted when the thread ends, even by panic
struct ExhaustedOnExit(Arc<AtomicBool>);

impl Drop for ExhaustedOnExit {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Background thread pumping a [`WindSource`] into a [`ReadingSlot`]
///
/// In real-time mode each reading is published at its timestamp relative to
/// the start of the feed; otherwise readings are published as fast as the
/// source yields them.
pub struct SensorFeed {
    handle: Option<thread::JoinHandle<()>>,
    stop_requested: Arc<AtomicBool>,
    exhausted: Arc<AtomicBool>,
}

impl SensorFeed {
    pub fn spawn(source: Box<dyn WindSource>, slot: ReadingSlot, realtime: bool) -> Self {
        let stop_requested = Arc::new(AtomicBool::new(false));
        let exhausted = Arc::new(AtomicBool::new(false));

        let handle = {
            let stop_requested = Arc::clone(&stop_requested);
            let exhausted = Arc::clone(&exhausted);
            thread::spawn(move || {
                let _exhausted = ExhaustedOnExit(exhausted);
                run_feed(source, &slot, realtime, &stop_requested);
            })
        };

        Self {
            handle: Some(handle),
            stop_requested,
            exhausted,
        }
    }

    /// True once the source has no more readings (or failed)
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }

    /// Stop the thread and wait for it
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop_requested.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Sensor feed thread panicked");
            }
        }
    }
}

impl Drop for SensorFeed {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_feed(
    mut source: Box<dyn WindSource>,
    slot: &ReadingSlot,
    realtime: bool,
    stop_requested: &AtomicBool,
) {
    let started = Instant::now();

    while !stop_requested.load(Ordering::Relaxed) {
        let timed = match source.poll_reading(MAX_SLEEP) {
            Ok(SourcePoll::Ready(timed)) => timed,
            Ok(SourcePoll::Pending) => continue,
            Ok(SourcePoll::Exhausted) => {
                log::info!("Sensor source exhausted after {} readings", slot.sequence());
                return;
            }
            Err(e) => {
                log::error!("Sensor source failed: {}", e);
                return;
            }
        };

        if realtime {
            let Ok(due) = Duration::try_from_secs_f32(timed.time_secs.max(0.0)) else {
                log::error!("Sensor reading time out of range: {}", timed.time_secs);
                return;
            };
            loop {
                if stop_requested.load(Ordering::Relaxed) {
                    return;
                }
                let elapsed = started.elapsed();
                if elapsed >= due {
                    break;
                }
                thread::sleep((due - elapsed).min(MAX_SLEEP));
            }
        }

        slot.publish(timed.reading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::RawReading;
    use crate::sensor::{ChannelSource, ReplaySource, TimedReading};
    use crate::error::Result;
    use std::io::Cursor;

    /// Yields one reading stamped far beyond any representable wait
    struct FarFuture(bool);

    impl WindSource for FarFuture {
        fn next_reading(&mut self) -> Result<Option<TimedReading>> {
            if std::mem::replace(&mut self.0, true) {
                return Ok(None);
            }
            Ok(Some(TimedReading {
                time_secs: 1e20,
                reading: RawReading::new(0.0, 0.0, 2.0),
            }))
        }
    }

    fn wait_until(mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_feed_drains_source() {
        let source = ReplaySource::from_reader(Cursor::new("0,0,1\n0,0,2\n0,0,3\n"), 0.0).unwrap();
        let slot = ReadingSlot::new();
        let feed = SensorFeed::spawn(Box::new(source), slot.clone(), false);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !feed.is_exhausted() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(feed.is_exhausted());
        assert_eq!(slot.latest(), Some(RawReading::new(0.0, 0.0, 3.0)));
        assert_eq!(slot.sequence(), 3);
        feed.stop();
    }

    #[test]
    fn test_stop_interrupts_realtime_wait() {
        let source =
            ReplaySource::from_reader(Cursor::new("0,0,1,0\n0,0,2,3600\n"), 0.0).unwrap();
        let slot = ReadingSlot::new();
        let feed = SensorFeed::spawn(Box::new(source), slot.clone(), true);

        let deadline = Instant::now() + Duration::from_secs(5);
        while slot.sequence() == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        let started = Instant::now();
        feed.stop();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(slot.latest(), Some(RawReading::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_stop_with_live_channel_sender() {
        let (tx, source) = ChannelSource::channel();
        let slot = ReadingSlot::new();
        let feed = SensorFeed::spawn(Box::new(source), slot.clone(), false);

        tx.send(RawReading::new(1.0, 2.0, 3.0)).unwrap();
        wait_until(|| slot.sequence() >= 1);
        assert_eq!(slot.sequence(), 1);

        // Stop on a helper thread so a hang fails the test instead of blocking it
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            feed.stop();
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(3)).is_ok());
        drop(tx);
    }

    #[test]
    fn test_out_of_range_time_ends_feed() {
        let slot = ReadingSlot::new();
        let feed = SensorFeed::spawn(Box::new(FarFuture(false)), slot.clone(), true);

        wait_until(|| feed.is_exhausted());
        assert!(feed.is_exhausted());
        assert_eq!(slot.sequence(), 0);
        feed.stop();
    }

    #[test]
    fn test_panicking_source_still_exhausts() {
        struct Broken;
        impl WindSource for Broken {
            fn next_reading(&mut self) -> Result<Option<TimedReading>> {
                panic!("sensor driver crashed");
            }
        }

        let feed = SensorFeed::spawn(Box::new(Broken), ReadingSlot::new(), false);
        wait_until(|| feed.is_exhausted());
        assert!(feed.is_exhausted());
        feed.stop();
    }
}
