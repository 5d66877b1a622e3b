//! Dispatch metrics for observability
//!
//! Counters for monitoring the health of the fan-out and async queues:
//! records written, sink failures, and back-pressure events.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by a context's multiplexer and its dispatch pools
///
/// # Example
///
/// ```
/// use unlog::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.dispatched_count(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Records fanned out to the sink list
    dispatched: AtomicU64,

    /// Individual sink writes that failed or panicked
    write_failures: AtomicU64,

    /// Records submitted to an async pool
    queued: AtomicU64,

    /// Number of times a submission found its queue full
    queue_full_events: AtomicU64,
}

impl DispatchMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            queued: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queued_count(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    /// Every queue-full event blocked its producer until space freed
    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_queue_full(&self) {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Failed sink writes per hundred dispatched records
    pub fn failure_rate(&self) -> f64 {
        let dispatched = self.dispatched_count();
        if dispatched == 0 {
            return 0.0;
        }
        (self.write_failures() as f64 / dispatched as f64) * 100.0
    }

    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.queued.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
    }
}
