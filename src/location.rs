//! Location pass-through.
//!
//! Thin, permission-gated wrapper over the platform location service
//! ([`LocationPlatform`]). Nothing here filters or fuses fixes; records are
//! forwarded as the platform reports them.
//!
//! Resolution order for a one-shot query is last-known GPS fix, then
//! last-known network fix. Streams request GPS updates at a fixed cadence
//! and release them on cancel or drop.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{SensingError, SensingResult};
use crate::types::LocationRecord;

/// Minimum time between streamed fixes.
pub const LOCATION_MIN_INTERVAL_MS: u64 = 1000;

/// Minimum displacement between streamed fixes (any movement).
pub const LOCATION_MIN_DISTANCE_M: f64 = 0.0;

/// Identifier handed out by the platform for one update request.
pub type UpdateId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationProvider {
    Gps,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationPermission {
    Fine,
    Coarse,
}

/// Parameters of a continuous update request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateRequest {
    pub provider: LocationProvider,
    pub min_interval: Duration,
    pub min_distance_m: f64,
}

impl Default for UpdateRequest {
    fn default() -> Self {
        Self {
            provider: LocationProvider::Gps,
            min_interval: Duration::from_millis(LOCATION_MIN_INTERVAL_MS),
            min_distance_m: LOCATION_MIN_DISTANCE_M,
        }
    }
}

/// The platform refused a call at runtime (permission revoked mid-flight,
/// policy restriction, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PlatformRefusal {
    pub message: String,
}

impl PlatformRefusal {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<PlatformRefusal> for SensingError {
    fn from(refusal: PlatformRefusal) -> Self {
        SensingError::SecurityError {
            message: refusal.message,
        }
    }
}

/// Platform location service.
pub trait LocationPlatform {
    fn is_provider_enabled(&self, provider: LocationProvider) -> bool;

    /// Whether fine location access is currently granted.
    fn has_location_permission(&self) -> bool;

    /// Ask the user for the given permissions. May return before the user answers.
    fn request_permissions(&self, permissions: &[LocationPermission]);

    fn last_known_location(
        &self,
        provider: LocationProvider,
    ) -> Result<Option<LocationRecord>, PlatformRefusal>;

    /// Start pushing fixes (or a runtime refusal) into `delivery`.
    fn request_updates(
        &self,
        request: &UpdateRequest,
        delivery: Sender<Result<LocationRecord, PlatformRefusal>>,
    ) -> Result<UpdateId, PlatformRefusal>;

    fn remove_updates(&self, id: UpdateId);
}

/// Permission-gated location queries and streams.
pub struct LocationService<P: LocationPlatform> {
    platform: Arc<P>,
}

impl<P: LocationPlatform> LocationService<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self { platform }
    }

    pub fn is_gps_enabled(&self) -> bool {
        self.platform.is_provider_enabled(LocationProvider::Gps)
    }

    /// Returns true when fine location is granted, asking for fine and
    /// coarse access first if it is not.
    pub fn request_permissions(&self) -> bool {
        if self.platform.has_location_permission() {
            return true;
        }
        self.platform
            .request_permissions(&[LocationPermission::Fine, LocationPermission::Coarse]);
        let granted = self.platform.has_location_permission();
        info!(granted, "location permissions requested");
        granted
    }

    /// Last known fix: GPS first, network as fallback.
    pub fn current_location(&self) -> SensingResult<LocationRecord> {
        self.ensure_permission()?;

        let resolved = self
            .platform
            .last_known_location(LocationProvider::Gps)
            .and_then(|fix| match fix {
                Some(fix) => Ok(Some(fix)),
                None => self.platform.last_known_location(LocationProvider::Network),
            });

        match resolved {
            Ok(Some(fix)) => {
                debug!(timestamp = fix.timestamp, accuracy = fix.accuracy, "location resolved");
                Ok(fix)
            }
            Ok(None) => {
                let err = SensingError::ResourceUnavailable {
                    resource: "last known location",
                };
                warn!(code = err.code(), "no last known location");
                Err(err)
            }
            Err(refusal) => {
                warn!(error = %refusal, "location query refused by platform");
                Err(refusal.into())
            }
        }
    }

    /// Start a continuous GPS stream.
    pub fn subscribe(&self) -> SensingResult<LocationStream<P>> {
        self.ensure_permission()?;

        let request = UpdateRequest::default();
        let (delivery, fixes) = mpsc::channel();
        let id = self
            .platform
            .request_updates(&request, delivery)
            .map_err(|refusal| {
                warn!(error = %refusal, "location updates refused by platform");
                SensingError::from(refusal)
            })?;

        info!(
            update = id,
            min_interval_ms = LOCATION_MIN_INTERVAL_MS,
            "location stream subscribed"
        );
        Ok(LocationStream {
            platform: Arc::clone(&self.platform),
            id,
            fixes,
            active: true,
        })
    }

    fn ensure_permission(&self) -> SensingResult<()> {
        if self.platform.has_location_permission() {
            Ok(())
        } else {
            warn!(code = "PERMISSION_DENIED", "location permission missing");
            Err(SensingError::PermissionDenied)
        }
    }
}

/// Cancellable sequence of location fixes.
///
/// Yields `Err` at most once: a runtime refusal ends the stream and releases
/// the platform registration; resubscribe through the service to continue.
pub struct LocationStream<P: LocationPlatform> {
    platform: Arc<P>,
    id: UpdateId,
    fixes: Receiver<Result<LocationRecord, PlatformRefusal>>,
    active: bool,
}

impl<P: LocationPlatform> LocationStream<P> {
    /// Block until the next fix. `None` once cancelled or disconnected.
    pub fn next_location(&mut self) -> Option<SensingResult<LocationRecord>> {
        if !self.active {
            return None;
        }
        match self.fixes.recv() {
            Ok(event) => self.deliver(event),
            Err(_) => {
                self.release();
                None
            }
        }
    }

    /// Next fix if one is already buffered.
    pub fn try_next_location(&mut self) -> Option<SensingResult<LocationRecord>> {
        if !self.active {
            return None;
        }
        match self.fixes.try_recv() {
            Ok(event) => self.deliver(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.release();
                None
            }
        }
    }

    /// Stop updates. Returns whether the stream was still active.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active;
        self.release();
        was_active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn deliver(
        &mut self,
        event: Result<LocationRecord, PlatformRefusal>,
    ) -> Option<SensingResult<LocationRecord>> {
        match event {
            Ok(fix) => Some(Ok(fix)),
            Err(refusal) => {
                warn!(error = %refusal, "location stream refused by platform");
                self.release();
                Some(Err(refusal.into()))
            }
        }
    }

    fn release(&mut self) {
        if self.active {
            self.active = false;
            self.platform.remove_updates(self.id);
            info!(update = self.id, "location updates removed");
        }
    }
}

impl<P: LocationPlatform> Iterator for LocationStream<P> {
    type Item = SensingResult<LocationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_location()
    }
}

impl<P: LocationPlatform> Drop for LocationStream<P> {
    fn drop(&mut self) {
        self.release();
    }
}
