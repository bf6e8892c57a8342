//! Optional counters for monitoring ring traffic.
//!
//! Each role only ever writes its own counters, and the two groups live on
//! separate cache lines so that bookkeeping on one side never invalidates the
//! other side's line.

use crate::sync::{AtomicU64, Ordering};
use crossbeam_utils::CachePadded;

/// Live counters owned by a `Ring`. Only updated when
/// `Config::metrics_enabled` is set.
#[derive(Debug)]
pub(crate) struct Metrics {
    producer: CachePadded<ProducerCounters>,
    consumer: CachePadded<ConsumerCounters>,
}

#[derive(Debug)]
struct ProducerCounters {
    messages_sent: AtomicU64,
    full_rejections: AtomicU64,
}

#[derive(Debug)]
struct ConsumerCounters {
    messages_received: AtomicU64,
    empty_polls: AtomicU64,
    batches_received: AtomicU64,
}

/// Point-in-time copy of a ring's traffic counters, returned by `metrics()`
/// on the ring and on both handles.
///
/// The two roles are read independently, so under concurrent traffic the
/// snapshot is advisory in the same way `Ring::len` is. The live counters
/// themselves are not part of the public API:
///
/// ```compile_fail
/// let counters = ringspsc_rs::Metrics::new();
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub full_rejections: u64,
    pub empty_polls: u64,
    pub batches_received: u64,
}

impl MetricsSnapshot {
    /// Values sent but not yet received when the snapshot was taken.
    #[inline]
    pub fn in_flight(&self) -> u64 {
        self.messages_sent.saturating_sub(self.messages_received)
    }
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self {
            producer: CachePadded::new(ProducerCounters {
                messages_sent: AtomicU64::new(0),
                full_rejections: AtomicU64::new(0),
            }),
            consumer: CachePadded::new(ConsumerCounters {
                messages_received: AtomicU64::new(0),
                empty_polls: AtomicU64::new(0),
                batches_received: AtomicU64::new(0),
            }),
        }
    }

    // Producer side

    #[inline]
    pub(crate) fn add_messages_sent(&self, n: u64) {
        self.producer.messages_sent.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_full_rejection(&self) {
        self.producer.full_rejections.fetch_add(1, Ordering::Relaxed);
    }

    // Consumer side

    #[inline]
    pub(crate) fn add_messages_received(&self, n: u64) {
        self.consumer.messages_received.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_empty_poll(&self) {
        self.consumer.empty_polls.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_batches_received(&self, n: u64) {
        self.consumer.batches_received.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_sent: self.producer.messages_sent.load(Ordering::Relaxed),
            messages_received: self.consumer.messages_received.load(Ordering::Relaxed),
            full_rejections: self.producer.full_rejections.load(Ordering::Relaxed),
            empty_polls: self.consumer.empty_polls.load(Ordering::Relaxed),
            batches_received: self.consumer.batches_received.load(Ordering::Relaxed),
        }
    }
}
