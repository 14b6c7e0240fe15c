use std::path::PathBuf;

/// Unified error type for the sensing engine and its platform pass-throughs.
///
/// Collaborator failures (location, biometric, sensor registration) are
/// surfaced verbatim with a stable [`code`](SensingError::code); nothing in
/// this crate retries them. The motion pipeline itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum SensingError {
    /// The required runtime permission has not been granted.
    #[error("Permission denied: location permission has not been granted")]
    PermissionDenied,

    /// The platform has nothing to return (e.g. no last-known location fix).
    #[error("{resource} unavailable")]
    ResourceUnavailable {
        /// What was requested.
        resource: &'static str,
    },

    /// The platform refused the call at runtime despite the permission check.
    #[error("Security error: {message}")]
    SecurityError {
        /// Message reported by the platform.
        message: String,
    },

    /// The device lacks the hardware or enrollment for this capability.
    #[error("{capability} is not supported on this device")]
    Unsupported {
        /// Capability that is missing.
        capability: &'static str,
    },

    /// A control method name that this channel does not handle.
    #[error("Method '{method}' is not implemented")]
    NotImplemented {
        /// Method name as received.
        method: String,
    },

    /// A configuration value failed validation.
    #[error("Invalid config for {field}: {reason}")]
    InvalidConfig {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A configuration file could not be read.
    #[error("Failed to read config from {path}: {source}")]
    ConfigRead {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for [`PipelineConfig`](crate::pipeline::PipelineConfig).
    #[error("Failed to parse config: {source}")]
    ConfigParse {
        /// The underlying error.
        #[from]
        source: toml::de::Error,
    },

    /// A record could not be rendered as JSON for the host.
    #[error("Failed to serialize record: {source}")]
    Serialization {
        /// The underlying error.
        #[from]
        source: serde_json::Error,
    },
}

impl SensingError {
    /// Stable machine-readable code forwarded to the host.
    pub fn code(&self) -> &'static str {
        match self {
            SensingError::PermissionDenied => "PERMISSION_DENIED",
            SensingError::ResourceUnavailable { .. } => "NO_LOCATION",
            SensingError::SecurityError { .. } => "SECURITY_ERROR",
            SensingError::Unsupported { .. } => "UNSUPPORTED",
            SensingError::NotImplemented { .. } => "NOT_IMPLEMENTED",
            SensingError::InvalidConfig { .. } => "INVALID_CONFIG",
            SensingError::ConfigRead { .. } => "CONFIG_IO",
            SensingError::ConfigParse { .. } => "CONFIG_PARSE",
            SensingError::Serialization { .. } => "SERIALIZATION",
        }
    }
}

/// Convenience alias used across the crate.
pub type SensingResult<T> = Result<T, SensingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(SensingError::PermissionDenied.code(), "PERMISSION_DENIED");
        assert_eq!(
            SensingError::ResourceUnavailable { resource: "location" }.code(),
            "NO_LOCATION"
        );
        assert_eq!(
            SensingError::SecurityError { message: "revoked".into() }.code(),
            "SECURITY_ERROR"
        );
        assert_eq!(
            SensingError::Unsupported { capability: "biometric" }.code(),
            "UNSUPPORTED"
        );
    }

    #[test]
    fn test_messages_carry_context() {
        let err = SensingError::SecurityError {
            message: "provider revoked".into(),
        };
        assert_eq!(err.to_string(), "Security error: provider revoked");

        let err = SensingError::NotImplemented {
            method: "pause".into(),
        };
        assert!(err.to_string().contains("pause"));
    }

    #[test]
    fn test_json_error_converts_with_question_mark() {
        fn render(raw: &str) -> SensingResult<serde_json::Value> {
            Ok(serde_json::from_str(raw)?)
        }

        let err = render("{not json").unwrap_err();
        assert_eq!(err.code(), "SERIALIZATION");
        assert!(err.to_string().starts_with("Failed to serialize record"));
    }
}
