//! Alert metrics seam consumed during module construction.
//!
//! The metrics-aggregation backend is an external collaborator; this crate
//! only ever increments an alert counter, exactly once per malformed section
//! encountered while building a module.

use std::sync::atomic::{AtomicU64, Ordering};

/// Category an alert is filed under. This engine files everything under
/// [`AlertCategory::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertCategory {
    General,
}

impl AlertCategory {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::General => "general",
        }
    }
}

/// Sink for alert increments.
///
/// Implementations must tolerate concurrent increments; the engine treats the
/// sink as a monotonic counter and never reads it on the evaluation path.
pub trait Metrics: Send + Sync {
    fn update_alerts_metrics(&self, category: AlertCategory);
}

/// In-process metrics backed by atomic counters.
///
/// Suitable for tests, the CLI, and hosts without a metrics pipeline.
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    general_alerts: AtomicU64,
}

impl AtomicMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current alert count for a category.
    #[must_use]
    pub fn alerts(&self, category: AlertCategory) -> u64 {
        match category {
            AlertCategory::General => self.general_alerts.load(Ordering::Relaxed),
        }
    }
}

impl Metrics for AtomicMetrics {
    fn update_alerts_metrics(&self, category: AlertCategory) {
        match category {
            AlertCategory::General => {
                self.general_alerts.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
