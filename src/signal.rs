//! Magnitude extraction and moving-average smoothing.
//!
//! The accelerometer vector is reduced to its Euclidean norm, gravity
//! included. A short FIFO history of those norms feeds a plain arithmetic
//! mean, which is what the activity classifier sees.
//!
//! Design note: the history is bounded by `window_size`, so every update is
//! O(window) with no allocation after the deque reaches capacity.
//! NaN/Inf inputs are not sanitized; they propagate into the mean until
//! they age out of the window.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::RawSample;

/// Number of magnitudes averaged by default.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Parameters for magnitude smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Capacity of the moving-average history, in samples.
    /// Larger = smoother but slower to react. Must be at least 1.
    pub window_size: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// Bounded FIFO of recent magnitudes.
#[derive(Debug, Clone)]
pub struct MagnitudeHistory {
    values: VecDeque<f64>,
    capacity: usize,
}

impl MagnitudeHistory {
    /// Create an empty history. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a value, evicting the oldest one on overflow.
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    /// Arithmetic mean of the held values, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Values from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Moving-average filter over accelerometer magnitudes.
#[derive(Debug, Clone)]
pub struct MagnitudeFilter {
    history: MagnitudeHistory,
    smoothed: f64,
}

impl MagnitudeFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            history: MagnitudeHistory::new(config.window_size),
            smoothed: 0.0,
        }
    }

    /// Euclidean norm of a raw sample.
    pub fn magnitude(sample: &RawSample) -> f64 {
        sample.magnitude()
    }

    /// Add a raw sample and return the updated moving average.
    pub fn push(&mut self, sample: &RawSample) -> f64 {
        self.push_magnitude(Self::magnitude(sample))
    }

    /// Add an already-computed magnitude and return the updated moving average.
    pub fn push_magnitude(&mut self, magnitude: f64) -> f64 {
        self.history.push(magnitude);
        self.smoothed = self.history.mean();
        self.smoothed
    }

    /// Most recent moving average (0.0 before the first sample).
    pub fn smoothed(&self) -> f64 {
        self.smoothed
    }

    pub fn history(&self) -> &MagnitudeHistory {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.smoothed = 0.0;
    }
}

impl Default for MagnitudeFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}
