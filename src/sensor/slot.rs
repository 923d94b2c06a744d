use std::sync::{Arc, Mutex, MutexGuard};

use crate::session::{RawReading, SensorEvent};

#[derive(Default)]
struct SlotState {
    reading: RawReading,
    sequence: u64,
}

/// Single-slot, last-write-wins hand-off between the sensor thread and the
/// frame thread
///
/// Writers overwrite the whole reading under a lock, so a reader never sees
/// a mix of two readings. There is no queue: readings published between two
/// frames are collapsed into the latest one.
#[derive(Clone, Default)]
pub struct ReadingSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl ReadingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // A panicking writer cannot leave a half-written Copy value behind
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the stored reading
    pub fn publish(&self, reading: RawReading) {
        let mut state = self.lock();
        state.reading.merge(reading);
        state.sequence += 1;
    }

    /// Overwrite one field of the stored reading
    pub fn publish_event(&self, event: SensorEvent) {
        let mut state = self.lock();
        state.reading.apply(event);
        state.sequence += 1;
    }

    /// Latest reading, or `None` before anything was published
    pub fn latest(&self) -> Option<RawReading> {
        let state = self.lock();
        (state.sequence > 0).then_some(state.reading)
    }

    /// Number of writes so far
    pub fn sequence(&self) -> u64 {
        self.lock().sequence
    }
}
