//! Biometric pass-through.
//!
//! A support check and a single prompt whose outcome is collapsed to a
//! boolean. The prompt itself belongs to the platform ([`BiometricPlatform`]);
//! this module only decides which prompt events are terminal.

use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{SensingError, SensingResult};

/// Platform error code reported when the user taps the negative button.
pub const ERROR_NEGATIVE_BUTTON: i32 = 13;

/// Platform error code reported when the user dismisses the prompt.
pub const ERROR_USER_CANCELED: i32 = 10;

/// Authenticator classes a prompt may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authenticators {
    /// Class 3 biometrics (fingerprint, secure face).
    BiometricStrong,
}

/// Result of the platform's capability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricAvailability {
    Available,
    NoHardware,
    HardwareUnavailable,
    NoneEnrolled,
    SecurityUpdateRequired,
    Unknown,
}

/// Text and policy of the prompt shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInfo {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub negative_button_text: String,
    pub authenticators: Authenticators,
}

impl Default for PromptInfo {
    fn default() -> Self {
        Self {
            title: "Biometric authentication".to_string(),
            subtitle: "Use your fingerprint".to_string(),
            description: "Place your finger on the sensor".to_string(),
            negative_button_text: "Cancel".to_string(),
            authenticators: Authenticators::BiometricStrong,
        }
    }
}

/// Callback events from an open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Succeeded,
    /// A biometric was read but not recognised. The prompt stays open.
    Failed,
    /// The prompt closed without success (including user cancellation).
    Error { code: i32, message: String },
}

impl PromptEvent {
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            PromptEvent::Error { code, .. }
                if *code == ERROR_NEGATIVE_BUTTON || *code == ERROR_USER_CANCELED
        )
    }
}

pub trait BiometricPlatform {
    fn can_authenticate(&self, authenticators: Authenticators) -> BiometricAvailability;

    /// Show the prompt and report its events into `events` until it closes.
    fn show_prompt(&self, info: &PromptInfo, events: Sender<PromptEvent>);
}

pub struct BiometricService<P: BiometricPlatform> {
    platform: Arc<P>,
    prompt: PromptInfo,
}

impl<P: BiometricPlatform> BiometricService<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            prompt: PromptInfo::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: PromptInfo) -> Self {
        self.prompt = prompt;
        self
    }

    /// True only when strong biometrics are enrolled and usable.
    pub fn check_support(&self) -> bool {
        self.availability() == BiometricAvailability::Available
    }

    pub fn availability(&self) -> BiometricAvailability {
        self.platform.can_authenticate(self.prompt.authenticators)
    }

    /// Show one prompt and wait for its outcome. Unrecognised attempts keep
    /// waiting; any error or cancellation resolves to false.
    pub fn authenticate(&self) -> bool {
        let (events, outcome) = mpsc::channel();
        self.platform.show_prompt(&self.prompt, events);

        while let Ok(event) = outcome.recv() {
            if event.is_cancellation() {
                info!("biometric prompt cancelled");
                return false;
            }
            match event {
                PromptEvent::Succeeded => {
                    info!("biometric authentication succeeded");
                    return true;
                }
                PromptEvent::Failed => {
                    debug!("biometric not recognised, prompt still open");
                }
                PromptEvent::Error { code, message } => {
                    warn!(code, message = %message, "biometric prompt error");
                    return false;
                }
            }
        }

        warn!("biometric prompt closed without an outcome");
        false
    }

    /// Like [`authenticate`](Self::authenticate), but reports missing
    /// support as `Unsupported` instead of showing a prompt.
    pub fn try_authenticate(&self) -> SensingResult<bool> {
        let availability = self.availability();
        if availability != BiometricAvailability::Available {
            warn!(?availability, "biometric authentication unsupported");
            return Err(SensingError::Unsupported {
                capability: "strong biometric authentication",
            });
        }
        Ok(self.authenticate())
    }
}
