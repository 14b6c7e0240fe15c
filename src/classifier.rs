//! Activity classification with a debounce counter.
//!
//! The smoothed magnitude is mapped into one of three bands:
//!
//! ```text
//! m < walking_threshold                      -> Stationary
//! walking_threshold <= m < running_threshold -> Walking
//! m >= running_threshold                     -> Running
//! ```
//!
//! Band selection is stateless. On top of it the classifier tracks how many
//! consecutive ticks produced the same candidate as the tick before
//! (`confidence`). Whether that counter gates the visible label is a
//! configuration choice, see [`DebouncePolicy`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::ActivityType;

/// Lower edge (inclusive) of the walking band, in m/s².
pub const DEFAULT_WALKING_THRESHOLD: f64 = 10.5;

/// Lower edge (inclusive) of the running band, in m/s².
pub const DEFAULT_RUNNING_THRESHOLD: f64 = 13.5;

/// Agreeing ticks required before a gated transition commits.
pub const DEFAULT_DEBOUNCE_TICKS: u32 = 3;

/// How the debounce counter affects the committed activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebouncePolicy {
    /// The committed activity follows the candidate on every tick. The
    /// counter is maintained for diagnostics but never gates anything.
    #[default]
    Immediate,
    /// The committed activity only moves to the candidate once the counter
    /// reaches `debounce_ticks`.
    Gated,
}

/// Configuration for activity classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Inclusive lower edge of the walking band (m/s²).
    pub walking_threshold: f64,
    /// Inclusive lower edge of the running band (m/s²).
    pub running_threshold: f64,
    /// Counter value at which a gated transition commits.
    pub debounce_ticks: u32,
    /// Whether the counter gates the committed activity.
    pub policy: DebouncePolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            walking_threshold: DEFAULT_WALKING_THRESHOLD,
            running_threshold: DEFAULT_RUNNING_THRESHOLD,
            debounce_ticks: DEFAULT_DEBOUNCE_TICKS,
            policy: DebouncePolicy::Immediate,
        }
    }
}

impl ClassifierConfig {
    /// Default thresholds with gated commits.
    pub fn gated() -> Self {
        Self {
            policy: DebouncePolicy::Gated,
            ..Self::default()
        }
    }

    /// Band for a smoothed magnitude. NaN compares false everywhere and
    /// lands in the top band.
    pub fn band(&self, smoothed: f64) -> ActivityType {
        if smoothed < self.walking_threshold {
            ActivityType::Stationary
        } else if smoothed < self.running_threshold {
            ActivityType::Walking
        } else {
            ActivityType::Running
        }
    }
}

/// Stateful activity classifier.
///
/// Tracks:
/// - the committed (externally visible) activity
/// - the previous tick's candidate
/// - the count of consecutive agreeing candidates
#[derive(Debug, Clone)]
pub struct ActivityClassifier {
    config: ClassifierConfig,
    committed: ActivityType,
    candidate: ActivityType,
    confidence: u32,
    transitions: u64,
}

impl ActivityClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            committed: ActivityType::Stationary,
            candidate: ActivityType::Stationary,
            confidence: 0,
            transitions: 0,
        }
    }

    /// Classify one smoothed magnitude and return the committed activity.
    pub fn observe(&mut self, smoothed: f64) -> ActivityType {
        let candidate = self.config.band(smoothed);

        if candidate == self.candidate {
            self.confidence = self.confidence.saturating_add(1);
        } else {
            self.confidence = 0;
        }
        self.candidate = candidate;

        let commit = match self.config.policy {
            DebouncePolicy::Immediate => true,
            DebouncePolicy::Gated => self.confidence >= self.config.debounce_ticks,
        };

        if commit && candidate != self.committed {
            debug!(
                from = %self.committed,
                to = %candidate,
                confidence = self.confidence,
                smoothed,
                "activity changed"
            );
            self.committed = candidate;
            self.transitions += 1;
        }

        self.committed
    }

    /// Externally visible activity.
    pub fn committed(&self) -> ActivityType {
        self.committed
    }

    /// Band chosen on the most recent tick.
    pub fn candidate(&self) -> ActivityType {
        self.candidate
    }

    /// Consecutive ticks whose candidate matched the tick before.
    pub fn confidence(&self) -> u32 {
        self.confidence
    }

    pub fn policy(&self) -> DebouncePolicy {
        self.config.policy
    }

    /// Number of committed activity changes so far.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

impl Default for ActivityClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(classifier: &mut ActivityClassifier, values: &[f64]) -> Vec<ActivityType> {
        values.iter().map(|&m| classifier.observe(m)).collect()
    }

    #[test]
    fn test_classifier_config_default() {
        let config = ClassifierConfig::default();
        assert_eq!(config.walking_threshold, 10.5);
        assert_eq!(config.running_threshold, 13.5);
        assert_eq!(config.debounce_ticks, 3);
        assert_eq!(config.policy, DebouncePolicy::Immediate);
    }

    #[test]
    fn test_bands() {
        let config = ClassifierConfig::default();
        assert_eq!(config.band(9.0), ActivityType::Stationary);
        assert_eq!(config.band(12.0), ActivityType::Walking);
        assert_eq!(config.band(15.0), ActivityType::Running);
    }

    #[test]
    fn test_band_edges_belong_to_upper_band() {
        let config = ClassifierConfig::default();
        assert_eq!(config.band(10.5), ActivityType::Walking);
        assert_eq!(config.band(13.5), ActivityType::Running);
        assert_eq!(config.band(10.499_999), ActivityType::Stationary);
    }

    #[test]
    fn test_nan_lands_in_running_band() {
        assert_eq!(ClassifierConfig::default().band(f64::NAN), ActivityType::Running);
    }

    #[test]
    fn test_initial_state() {
        let classifier = ActivityClassifier::default();
        assert_eq!(classifier.committed(), ActivityType::Stationary);
        assert_eq!(classifier.candidate(), ActivityType::Stationary);
        assert_eq!(classifier.confidence(), 0);
    }

    #[test]
    fn test_constant_inputs_classify_on_first_tick() {
        for (value, expected) in [
            (9.0, ActivityType::Stationary),
            (12.0, ActivityType::Walking),
            (15.0, ActivityType::Running),
        ] {
            let mut classifier = ActivityClassifier::default();
            assert_eq!(classifier.observe(value), expected);
        }
    }

    #[test]
    fn test_confidence_counts_agreeing_ticks() {
        let mut classifier = ActivityClassifier::default();
        feed(&mut classifier, &[12.0, 12.0, 12.0]);
        // First walking tick differs from the initial stationary candidate.
        assert_eq!(classifier.confidence(), 2);

        classifier.observe(9.0);
        assert_eq!(classifier.confidence(), 0);
    }

    #[test]
    fn test_confidence_starts_counting_from_initial_candidate() {
        let mut classifier = ActivityClassifier::default();
        classifier.observe(9.0);
        assert_eq!(classifier.confidence(), 1);
    }

    #[test]
    fn test_immediate_switches_on_band_change() {
        let mut classifier = ActivityClassifier::default();
        let labels = feed(&mut classifier, &[9.0, 9.0, 12.0, 15.0, 9.0]);
        assert_eq!(
            labels,
            vec![
                ActivityType::Stationary,
                ActivityType::Stationary,
                ActivityType::Walking,
                ActivityType::Running,
                ActivityType::Stationary,
            ]
        );
        assert_eq!(classifier.transition_count(), 3);
    }

    #[test]
    fn test_gated_waits_for_confidence() {
        let mut classifier = ActivityClassifier::new(ClassifierConfig::gated());
        let labels = feed(&mut classifier, &[12.0, 12.0, 12.0, 12.0, 12.0]);

        // Confidence after each tick: 0, 1, 2, 3, 4.
        assert_eq!(
            labels,
            vec![
                ActivityType::Stationary,
                ActivityType::Stationary,
                ActivityType::Stationary,
                ActivityType::Walking,
                ActivityType::Walking,
            ]
        );
    }

    #[test]
    fn test_gated_ignores_flapping() {
        let mut classifier = ActivityClassifier::new(ClassifierConfig::gated());
        for _ in 0..20 {
            classifier.observe(10.4);
            classifier.observe(10.6);
        }
        assert_eq!(classifier.committed(), ActivityType::Stationary);
        assert_eq!(classifier.transition_count(), 0);
    }

    #[test]
    fn test_gated_custom_ticks() {
        let config = ClassifierConfig {
            debounce_ticks: 1,
            ..ClassifierConfig::gated()
        };
        let mut classifier = ActivityClassifier::new(config);
        assert_eq!(classifier.observe(15.0), ActivityType::Stationary);
        assert_eq!(classifier.observe(15.0), ActivityType::Running);
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: DebouncePolicy = serde_json::from_str("\"gated\"").unwrap();
        assert_eq!(policy, DebouncePolicy::Gated);
        assert_eq!(
            serde_json::to_string(&DebouncePolicy::Immediate).unwrap(),
            "\"immediate\""
        );
    }
}
