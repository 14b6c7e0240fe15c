//! Motion activity pipeline integrating all per-sample processing stages.
//!
//! This module orchestrates the data flow from raw accelerometer samples
//! through smoothing, step detection and activity classification to produce
//! batched [`ActivityReport`] outputs.
//!
//! # Architecture
//!
//! Per sample:
//! 1. **Magnitude**: Euclidean norm of the raw vector, computed once
//! 2. **Smoothing**: moving average over the last `window_size` magnitudes
//! 3. **Step Detection**: rising-edge crossings on the *raw* magnitude
//! 4. **Classification**: band + debounce on the *smoothed* magnitude
//! 5. **Batching**: every `batch_size` samples, surface one report
//!
//! Every stage is infallible and O(window). State is owned by the pipeline
//! and mutated through `&mut self`; one pipeline per sensor subscription.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::batching::{ReportBatcher, DEFAULT_BATCH_SIZE};
use crate::classifier::{ActivityClassifier, ClassifierConfig, DebouncePolicy};
use crate::control::{Ack, ControlCommand};
use crate::error::SensingResult;
use crate::signal::{FilterConfig, MagnitudeFilter};
use crate::step_detection::{StepDetector, StepDetectorConfig};
use crate::types::{ActivityReport, ActivityType, RawSample};

/// Configuration for the complete motion pipeline.
///
/// Bundles all sub-component configurations into a single package. Every
/// field has a default, so a config file may override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Moving-average parameters.
    pub filter: FilterConfig,

    /// Step crossing threshold.
    pub step: StepDetectorConfig,

    /// Activity bands and debounce policy.
    pub classifier: ClassifierConfig,

    /// Samples per emitted report.
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            step: StepDetectorConfig::default(),
            classifier: ClassifierConfig::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Default configuration with the given debounce policy.
    pub fn with_policy(policy: DebouncePolicy) -> Self {
        let mut config = Self::default();
        config.classifier.policy = policy;
        config
    }
}

/// Complete motion pipeline processor.
///
/// Maintains internal state across all stages and emits an
/// [`ActivityReport`] every `batch_size` samples.
#[derive(Debug, Clone)]
pub struct MotionPipeline {
    config: PipelineConfig,

    // Processing stages
    filter: MagnitudeFilter,
    step_detector: StepDetector,
    classifier: ActivityClassifier,
    batcher: ReportBatcher,

    total_samples: u64,
}

impl MotionPipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// Degenerate sizes (0) are clamped to 1; use [`MotionPipeline::try_new`]
    /// to reject invalid configurations instead.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            filter: MagnitudeFilter::new(config.filter.clone()),
            step_detector: StepDetector::new(config.step.clone()),
            classifier: ActivityClassifier::new(config.classifier.clone()),
            batcher: ReportBatcher::new(config.batch_size),
            config,
            total_samples: 0,
        }
    }

    /// Validates the configuration, then builds the pipeline.
    pub fn try_new(config: PipelineConfig) -> SensingResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Processes a single raw sample through the entire pipeline.
    ///
    /// Returns `Some(report)` when this sample closes a batch, `None` otherwise.
    pub fn ingest(&mut self, sample: &RawSample) -> Option<ActivityReport> {
        // Stage 1: magnitude, shared by both detectors
        let raw = MagnitudeFilter::magnitude(sample);

        // Stage 2: smoothing
        let smoothed = self.filter.push_magnitude(raw);

        // Stage 3: steps run on the raw signal
        self.step_detector.observe(raw);

        // Stage 4: classification runs on the smoothed signal
        let activity = self.classifier.observe(smoothed);

        self.total_samples += 1;
        trace!(raw, smoothed, activity = %activity, "sample ingested");

        // Stage 5: batching
        self.batcher
            .tick(self.step_detector.step_count(), activity, smoothed)
    }

    /// Ingests a slice of samples and returns every report produced.
    pub fn ingest_batch(&mut self, samples: &[RawSample]) -> Vec<ActivityReport> {
        samples
            .iter()
            .filter_map(|sample| self.ingest(sample))
            .collect()
    }

    /// Applies a control command. Only the step counter is affected;
    /// smoothing and classification state carry on.
    pub fn apply(&mut self, command: ControlCommand) -> Ack {
        if command.resets_steps() {
            self.step_detector.reset();
        }
        Ack {
            command,
            step_count: self.step_detector.step_count(),
        }
    }

    /// Zeroes the step counter.
    pub fn reset(&mut self) {
        self.step_detector.reset();
    }

    /// Steps counted since creation or the last start/reset.
    pub fn step_count(&self) -> u64 {
        self.step_detector.step_count()
    }

    /// Currently committed activity.
    pub fn activity(&self) -> ActivityType {
        self.classifier.committed()
    }

    /// Most recent moving-average magnitude.
    pub fn smoothed(&self) -> f64 {
        self.filter.smoothed()
    }

    /// Returns the total sample count processed so far.
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    /// Returns the number of samples counted toward the next report.
    pub fn pending_samples(&self) -> usize {
        self.batcher.pending()
    }

    pub fn classifier(&self) -> &ActivityClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl Default for MotionPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
