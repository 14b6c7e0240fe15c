//! Report batching.
//!
//! The sensor delivers samples at its native rate (tens of Hz); consumers
//! only need a fraction of that. The batcher counts ingested samples and
//! surfaces one consolidated [`ActivityReport`] every `batch_size` ticks.

use crate::types::{ActivityReport, ActivityType};

/// Samples per emitted report by default.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Emits a report on every Kth tick.
#[derive(Debug, Clone)]
pub struct ReportBatcher {
    batch_size: usize,
    pending: usize,
    emitted: u64,
}

impl ReportBatcher {
    /// Create a batcher. A batch size of 0 is treated as 1.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            pending: 0,
            emitted: 0,
        }
    }

    /// Count one ingested sample; returns the report if this tick closes a batch.
    pub fn tick(
        &mut self,
        step_count: u64,
        activity: ActivityType,
        smoothed: f64,
    ) -> Option<ActivityReport> {
        self.pending += 1;
        if self.pending < self.batch_size {
            return None;
        }

        self.pending = 0;
        self.emitted += 1;
        Some(ActivityReport::new(step_count, activity, smoothed))
    }

    /// Samples counted toward the current batch.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Reports emitted since creation.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl Default for ReportBatcher {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
