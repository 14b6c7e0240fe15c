//! Long-running and property-based checks for the motion pipeline.
//!
//! These exercise the guarantees that only show up over many samples or
//! arbitrary inputs: bounded state, monotone step counts, exact moving
//! averages and fixed report cadence.

use approx::assert_relative_eq;
use proptest::prelude::*;

use crate::classifier::DebouncePolicy;
use crate::pipeline::{MotionPipeline, PipelineConfig};
use crate::signal::DEFAULT_WINDOW_SIZE;
use crate::types::{ActivityType, RawSample};

fn axis() -> impl Strategy<Value = f64> {
    -40.0f64..40.0
}

fn sample() -> impl Strategy<Value = RawSample> {
    (axis(), axis(), axis()).prop_map(|(x, y, z)| RawSample::new(x, y, z))
}

fn policy() -> impl Strategy<Value = DebouncePolicy> {
    prop_oneof![Just(DebouncePolicy::Immediate), Just(DebouncePolicy::Gated)]
}

// ============================================================================
// CATEGORY 1: PROPERTIES OVER ARBITRARY STREAMS
// ============================================================================

proptest! {
    #[test]
    fn prop_step_count_is_monotone(samples in prop::collection::vec(sample(), 0..300), policy in policy()) {
        let mut pipeline = MotionPipeline::new(PipelineConfig::with_policy(policy));
        let mut previous = 0;
        for sample in &samples {
            pipeline.ingest(sample);
            prop_assert!(pipeline.step_count() >= previous);
            previous = pipeline.step_count();
        }
    }

    #[test]
    fn prop_report_count_is_floor_of_thirds(samples in prop::collection::vec(sample(), 0..300)) {
        let mut pipeline = MotionPipeline::default();
        let reports = pipeline.ingest_batch(&samples);
        prop_assert_eq!(reports.len(), samples.len() / 3);
        prop_assert_eq!(pipeline.pending_samples(), samples.len() % 3);
    }

    #[test]
    fn prop_smoothed_is_mean_of_recent_window(samples in prop::collection::vec(sample(), 1..100)) {
        let mut pipeline = MotionPipeline::default();
        let mut magnitudes = Vec::with_capacity(samples.len());

        for sample in &samples {
            pipeline.ingest(sample);
            magnitudes.push(sample.magnitude());

            let recent = &magnitudes[magnitudes.len().saturating_sub(DEFAULT_WINDOW_SIZE)..];
            let expected = recent.iter().sum::<f64>() / recent.len() as f64;
            prop_assert!((pipeline.smoothed() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_steps_bounded_by_half_the_samples(samples in prop::collection::vec(sample(), 0..300)) {
        // every rising edge needs a sample at or below threshold before it,
        // except possibly the very first
        let mut pipeline = MotionPipeline::default();
        pipeline.ingest_batch(&samples);
        prop_assert!(pipeline.step_count() as usize <= samples.len().div_ceil(2));
    }

    #[test]
    fn prop_immediate_report_matches_band_of_smoothed(samples in prop::collection::vec(sample(), 3..120)) {
        let mut pipeline = MotionPipeline::default();
        let bands = pipeline.config().classifier.clone();
        for report in pipeline.ingest_batch(&samples) {
            prop_assert_eq!(report.activity_type, bands.band(report.smoothed_magnitude));
        }
    }
}

// ============================================================================
// CATEGORY 2: EXTREME DURATION
// ============================================================================

/// One hour at 50 Hz alternating between rest and walking every minute.
#[test]
fn stress_one_hour_continuous_50hz() {
    let mut pipeline = MotionPipeline::default();
    let total = 50 * 60 * 60;

    let mut reports = 0usize;
    let mut walking_reports = 0usize;
    for i in 0..total {
        let minute = i / 3000;
        let magnitude = if minute % 2 == 0 {
            9.81
        } else if i % 2 == 0 {
            11.0
        } else {
            13.0
        };
        if let Some(report) = pipeline.ingest(&RawSample::new(0.0, 0.0, magnitude)) {
            reports += 1;
            if report.activity_type == ActivityType::Walking {
                walking_reports += 1;
            }
        }
    }

    assert_eq!(reports, total / 3);
    // 30 walking minutes of 1500 strikes each
    assert_eq!(pipeline.step_count(), 30 * 1500);
    assert!(walking_reports > reports / 3);
    assert_eq!(pipeline.classifier().transition_count(), 59);
    assert_relative_eq!(pipeline.smoothed(), 12.0, epsilon = 1e-9);
}

/// Pathological input: non-finite magnitudes must not wedge the counters.
#[test]
fn stress_non_finite_samples_do_not_stall_batching() {
    let mut pipeline = MotionPipeline::default();
    let mut reports = Vec::new();

    for i in 0..30 {
        let sample = match i % 3 {
            0 => RawSample::new(f64::NAN, 0.0, 0.0),
            1 => RawSample::new(f64::INFINITY, 0.0, 0.0),
            _ => RawSample::new(0.0, 0.0, 9.81),
        };
        reports.extend(pipeline.ingest(&sample));
    }

    assert_eq!(reports.len(), 10);
    assert_eq!(pipeline.total_samples(), 30);
}

/// Very long walk must keep the smoothed value exact after millions of pushes.
#[test]
fn stress_smoothing_does_not_drift() {
    let mut pipeline = MotionPipeline::default();
    for i in 0..1_000_000u32 {
        let magnitude = if i % 2 == 0 { 11.0 } else { 13.0 };
        pipeline.ingest(&RawSample::new(0.0, 0.0, magnitude));
    }

    assert_relative_eq!(pipeline.smoothed(), 12.0, epsilon = 1e-9);
    assert_eq!(pipeline.step_count(), 500_000);
}
