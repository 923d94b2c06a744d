use std::collections::VecDeque;

use crate::session::SmoothedReading;

/// One polar point of the wind history: speed as radius, direction as angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Wind speed in m/s
    pub radius: f32,
    /// Wind direction in degrees (unwrapped)
    pub angle: f32,
}

/// Bounded history of samples, oldest first
///
/// Pushing past capacity evicts the oldest sample. Samples store the wind
/// direction itself; dial rotation is applied at render time only, so
/// changing the rotation never rewrites history.
#[derive(Debug, Clone)]
pub struct Trail {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Append the current speed and wind direction
    pub fn record(&mut self, reading: &SmoothedReading) {
        self.push(Sample {
            radius: reading.speed,
            angle: reading.wind_direction,
        });
    }

    /// Samples in arrival order (oldest to newest)
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
