//! Fixed-capacity, time-ordered history of derived scalar signals.

use chrono::{DateTime, Utc};

/// A single (timestamp, value) observation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarSample {
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,
    /// Observed value
    pub value: f64,
}

impl ScalarSample {
    /// Create a new sample
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Append-only ring buffer of scalar samples.
///
/// Once `capacity` samples are stored, each append evicts the oldest.
/// Iteration order is always oldest to newest.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    samples: Vec<ScalarSample>,
    capacity: usize,
    start: usize,
}

impl SampleHistory {
    /// Create an empty history with the given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            start: 0,
        }
    }

    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, sample: ScalarSample) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.start] = sample;
            self.start = (self.start + 1) % self.capacity;
        }
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent sample
    pub fn latest(&self) -> Option<&ScalarSample> {
        if self.samples.is_empty() {
            None
        } else {
            let idx = (self.start + self.samples.len() - 1) % self.samples.len();
            Some(&self.samples[idx])
        }
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &ScalarSample> + '_ {
        let n = self.samples.len();
        (0..n).map(move |i| &self.samples[(self.start + i) % n])
    }

    /// The `n` most recent samples, oldest first
    pub fn last_n(&self, n: usize) -> Vec<ScalarSample> {
        let len = self.samples.len();
        let take = n.min(len);
        self.iter().skip(len - take).copied().collect()
    }

    /// Arithmetic mean of stored values
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(|s| s.value).sum::<f64>() / self.samples.len() as f64
    }

    /// Remove all samples
    pub fn clear(&mut self) {
        self.samples.clear();
        self.start = 0;
    }
}
