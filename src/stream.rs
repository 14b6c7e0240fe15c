//! Activity stream: a scoped accelerometer subscription feeding one pipeline.
//!
//! The platform sensor is abstracted by [`AccelerometerSource`]. Subscribing
//! registers a bounded delivery channel with the source; the channel owner
//! pulls samples through the pipeline and receives batched reports. The
//! registration is released exactly once, on [`ActivityChannel::cancel`],
//! on resubscription, when the source hangs up, or on drop.
//!
//! Control commands go through the same owner, so the pipeline is never
//! shared and needs no locking.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};
use std::sync::Arc;

use tracing::{info, warn};

use crate::control::{Ack, ControlCommand};
use crate::error::SensingResult;
use crate::pipeline::{MotionPipeline, PipelineConfig};
use crate::types::{ActivityReport, RawSample};

/// Samples buffered between the sensor callback and the consumer.
pub const DEFAULT_DELIVERY_CAPACITY: usize = 256;

/// Identifier handed out by a source for one registration.
pub type RegistrationId = u64;

/// Platform accelerometer.
///
/// Implementations push samples into `delivery` from their own callback
/// context until [`unregister`](AccelerometerSource::unregister) is called.
/// They should use `try_send` so a slow consumer never blocks the sensor.
pub trait AccelerometerSource {
    /// Start delivering samples. Fails with `Unsupported` when the device has
    /// no accelerometer.
    fn register(&self, delivery: SyncSender<RawSample>) -> SensingResult<RegistrationId>;

    /// Stop delivering samples for `id` and drop its sender.
    fn unregister(&self, id: RegistrationId);
}

/// Releases a source registration on drop.
struct SensorRegistration<S: AccelerometerSource> {
    source: Arc<S>,
    id: RegistrationId,
}

impl<S: AccelerometerSource> Drop for SensorRegistration<S> {
    fn drop(&mut self) {
        self.source.unregister(self.id);
        info!(registration = self.id, "accelerometer registration released");
    }
}

struct Subscription<S: AccelerometerSource> {
    // Declared first so the registration is released before the receiver drops.
    _registration: SensorRegistration<S>,
    samples: Receiver<RawSample>,
}

/// Owner of one motion pipeline and its (optional) sensor subscription.
pub struct ActivityChannel<S: AccelerometerSource> {
    source: Arc<S>,
    pipeline: MotionPipeline,
    subscription: Option<Subscription<S>>,
    capacity: usize,
}

impl<S: AccelerometerSource> ActivityChannel<S> {
    pub fn new(source: Arc<S>, config: PipelineConfig) -> Self {
        Self {
            source,
            pipeline: MotionPipeline::new(config),
            subscription: None,
            capacity: DEFAULT_DELIVERY_CAPACITY,
        }
    }

    /// Override the delivery buffer size for subsequent subscriptions.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Register with the source and begin ingesting. An existing
    /// subscription is released first. Pipeline state carries over.
    pub fn subscribe(&mut self) -> SensingResult<()> {
        self.subscription = None;

        let (delivery, samples) = mpsc::sync_channel(self.capacity);
        let id = self.source.register(delivery).map_err(|err| {
            warn!(code = err.code(), error = %err, "accelerometer registration failed");
            err
        })?;
        info!(registration = id, capacity = self.capacity, "activity stream subscribed");

        self.subscription = Some(Subscription {
            _registration: SensorRegistration {
                source: Arc::clone(&self.source),
                id,
            },
            samples,
        });
        Ok(())
    }

    /// Release the registration. Returns whether a subscription was active.
    /// Samples still buffered are discarded.
    pub fn cancel(&mut self) -> bool {
        self.subscription.take().is_some()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Block until the next report. Returns `None` when not subscribed or
    /// when the source hangs up (the subscription is then released).
    pub fn next_record(&mut self) -> Option<ActivityReport> {
        loop {
            let received = self.subscription.as_ref()?.samples.recv();
            match received {
                Ok(sample) => {
                    if let Some(report) = self.pipeline.ingest(&sample) {
                        return Some(report);
                    }
                }
                Err(_) => {
                    warn!("accelerometer source disconnected");
                    self.subscription = None;
                    return None;
                }
            }
        }
    }

    /// Ingest whatever has already been delivered, stopping at the first
    /// report. Never blocks.
    pub fn try_next_record(&mut self) -> Option<ActivityReport> {
        loop {
            let received = self.subscription.as_ref()?.samples.try_recv();
            match received {
                Ok(sample) => {
                    if let Some(report) = self.pipeline.ingest(&sample) {
                        return Some(report);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    warn!("accelerometer source disconnected");
                    self.subscription = None;
                    return None;
                }
            }
        }
    }

    /// Apply a control command to the owned pipeline.
    pub fn handle(&mut self, command: ControlCommand) -> Ack {
        let ack = self.pipeline.apply(command);
        info!(command = %command, step_count = ack.step_count, "control command handled");
        ack
    }

    /// Apply a control command given by method name.
    pub fn handle_method(&mut self, method: &str) -> SensingResult<Ack> {
        let command = method.parse::<ControlCommand>().map_err(|err| {
            warn!(method, "unknown control method");
            err
        })?;
        Ok(self.handle(command))
    }

    pub fn pipeline(&self) -> &MotionPipeline {
        &self.pipeline
    }
}

impl<S: AccelerometerSource> Iterator for ActivityChannel<S> {
    type Item = ActivityReport;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}
