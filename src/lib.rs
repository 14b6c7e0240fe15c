//! Motion Sensing Library
//!
//! Turns a raw accelerometer stream into a low-rate stream of activity
//! records: cumulative step count, coarse activity label and smoothed
//! acceleration magnitude. Also carries thin location and biometric
//! pass-throughs that sit behind the same host bridge.
//!
//! # Design Philosophy
//!
//! - **Deterministic core**: every stage is a pure state machine fed one
//!   sample at a time. No clocks, no threads, no I/O.
//! - **Platform at the edges**: sensors, location providers and biometric
//!   prompts are traits ([`stream::AccelerometerSource`],
//!   [`location::LocationPlatform`], [`biometric::BiometricPlatform`]).
//! - **Scoped subscriptions**: dropping or cancelling a stream releases its
//!   platform registration.
//!
//! # Example
//!
//! ```
//! use motion_sensing::{MotionPipeline, PipelineConfig, RawSample};
//!
//! let mut pipeline = MotionPipeline::new(PipelineConfig::default());
//! let mut reports = Vec::new();
//! for _ in 0..9 {
//!     if let Some(report) = pipeline.ingest(&RawSample::new(0.0, 0.0, 9.81)) {
//!         reports.push(report);
//!     }
//! }
//! assert_eq!(reports.len(), 3);
//! assert_eq!(reports[2].step_count, 0);
//! ```

pub mod batching;
pub mod biometric;
pub mod classifier;
pub mod config;
pub mod control;
pub mod error;
pub mod location;
pub mod pipeline;
pub mod signal;
pub mod step_detection;
pub mod stream;
pub mod tracing_setup;
pub mod types;

#[cfg(test)]
mod stress_tests;

// Re-export commonly used types
pub use classifier::{ActivityClassifier, ClassifierConfig, DebouncePolicy};
pub use control::{Ack, ControlCommand};
pub use error::{SensingError, SensingResult};
pub use pipeline::{MotionPipeline, PipelineConfig};
pub use signal::MagnitudeFilter;
pub use step_detection::StepDetector;
pub use stream::{AccelerometerSource, ActivityChannel};
pub use types::{ActivityReport, ActivityType, LocationRecord, RawSample};
