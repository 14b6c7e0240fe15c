//! Loading and validating [`PipelineConfig`] from TOML.
//!
//! ```toml
//! batch_size = 3
//!
//! [filter]
//! window_size = 10
//!
//! [step]
//! threshold = 12.0
//!
//! [classifier]
//! walking_threshold = 10.5
//! running_threshold = 13.5
//! debounce_ticks = 3
//! policy = "gated"
//! ```
//!
//! Every key is optional; omitted keys keep their defaults.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{SensingError, SensingResult};
use crate::pipeline::PipelineConfig;

impl PipelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> SensingResult<Self> {
        let config: PipelineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SensingResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| SensingError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        info!(
            path = %path.display(),
            window_size = config.filter.window_size,
            batch_size = config.batch_size,
            policy = ?config.classifier.policy,
            "pipeline config loaded"
        );
        Ok(config)
    }

    /// Check that every size is positive and the bands are well ordered.
    pub fn validate(&self) -> SensingResult<()> {
        if self.filter.window_size == 0 {
            return Err(invalid("filter.window_size", "must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "must be at least 1"));
        }
        if !self.step.threshold.is_finite() {
            return Err(invalid("step.threshold", "must be finite"));
        }

        let classifier = &self.classifier;
        if !classifier.walking_threshold.is_finite() {
            return Err(invalid("classifier.walking_threshold", "must be finite"));
        }
        if !classifier.running_threshold.is_finite() {
            return Err(invalid("classifier.running_threshold", "must be finite"));
        }
        if classifier.walking_threshold >= classifier.running_threshold {
            return Err(invalid(
                "classifier.running_threshold",
                format!(
                    "must exceed walking_threshold ({} >= {})",
                    classifier.walking_threshold, classifier.running_threshold
                ),
            ));
        }
        if classifier.debounce_ticks == 0 {
            return Err(invalid("classifier.debounce_ticks", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SensingError {
    SensingError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::DebouncePolicy;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = PipelineConfig::from_toml_str(
            r#"
            batch_size = 5

            [classifier]
            policy = "gated"
            "#,
        )
        .unwrap();

        assert_eq!(config.batch_size, 5);
        assert_eq!(config.classifier.policy, DebouncePolicy::Gated);
        assert_eq!(config.classifier.walking_threshold, 10.5);
        assert_eq!(config.filter.window_size, 10);
    }

    #[test]
    fn test_rejects_inverted_bands() {
        let err = PipelineConfig::from_toml_str(
            r#"
            [classifier]
            walking_threshold = 14.0
            running_threshold = 13.5
            "#,
        )
        .unwrap_err();

        assert_eq!(err.code(), "INVALID_CONFIG");
        assert!(err.to_string().contains("running_threshold"));
    }

    #[test]
    fn test_rejects_zero_sizes() {
        let mut config = PipelineConfig::default();
        config.filter.window_size = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.classifier.debounce_ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_threshold() {
        let mut config = PipelineConfig::default();
        config.step.threshold = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_code() {
        let err = PipelineConfig::from_toml_str("batch_size = \"three\"").unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE");
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineConfig::load("/nonexistent/motion.toml").unwrap_err();
        assert_eq!(err.code(), "CONFIG_IO");
    }
}
