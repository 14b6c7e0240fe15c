//! Step Detection Module.
//!
//! Counts steps as rising-edge crossings of a fixed threshold on the raw
//! (unsmoothed) accelerometer magnitude. Each foot strike produces a short
//! spike well above 1 g; smoothing would blur consecutive strikes together,
//! so the detector deliberately reads the raw signal.
//!
//! A crossing requires the previous sample to be at or below the threshold,
//! so a sustained plateau above it counts once.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw magnitude (m/s²) a sample must exceed to register a foot strike.
pub const DEFAULT_STEP_THRESHOLD: f64 = 12.0;

/// Configuration for step detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepDetectorConfig {
    /// Crossing threshold on the raw magnitude (m/s²).
    pub threshold: f64,
}

impl Default for StepDetectorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_STEP_THRESHOLD,
        }
    }
}

/// Rising-edge step counter.
#[derive(Debug, Clone)]
pub struct StepDetector {
    config: StepDetectorConfig,
    step_count: u64,
    last_raw_magnitude: f64,
}

impl StepDetector {
    /// Create a new step detector with the given configuration.
    pub fn new(config: StepDetectorConfig) -> Self {
        Self {
            config,
            step_count: 0,
            last_raw_magnitude: 0.0,
        }
    }

    /// Feed one raw magnitude. Returns true if it completed a rising edge.
    pub fn observe(&mut self, raw_magnitude: f64) -> bool {
        let threshold = self.config.threshold;
        let detected = raw_magnitude > threshold && self.last_raw_magnitude <= threshold;

        if detected {
            self.step_count = self.step_count.saturating_add(1);
            debug!(
                step_count = self.step_count,
                raw_magnitude, "step detected"
            );
        }

        self.last_raw_magnitude = raw_magnitude;
        detected
    }

    /// Feed a run of magnitudes and return how many steps they produced.
    pub fn observe_all(&mut self, magnitudes: &[f64]) -> u64 {
        magnitudes
            .iter()
            .filter(|&&magnitude| self.observe(magnitude))
            .count() as u64
    }

    /// Steps counted since creation or the last reset.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn last_raw_magnitude(&self) -> f64 {
        self.last_raw_magnitude
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Zero the counter. Edge memory is kept, so a reset in the middle of a
    /// plateau does not produce a phantom step on the next sample.
    pub fn reset(&mut self) {
        self.step_count = 0;
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new(StepDetectorConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
