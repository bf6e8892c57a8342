use crate::channel::{Consumer, Producer};
use crate::invariants::{
    debug_assert_bounded_count, debug_assert_head_not_past_tail, debug_assert_initialized_read,
};
use crate::metrics::Metrics;
use crate::sync::{Arc, AtomicU64, Ordering, UnsafeCell};
use crate::{Config, Full, MetricsSnapshot, RingError};
use crossbeam_utils::CachePadded;
use std::mem::MaybeUninit;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// ## Positions
//
// `tail` (write position) and `head` (read position) are free-running u64
// counters. They are allowed to wrap; only `tail - head` in wrapping
// arithmetic is meaningful, and it always lies in `0..=capacity`. The slot
// for position `p` is `p & mask`.
//
// ## Memory Ordering Protocol
//
// **Producer (try_push):**
// 1. Load `tail` with Relaxed (only producer writes tail)
// 2. Read `cached_head` (UnsafeCell, producer-only)
// 3. If the cache says full: load `head` with Acquire and refresh the cache
// 4. Write the value into slot `tail & mask` (plain write)
// 5. Store `tail + 1` with Release (publishes the slot to the consumer)
//
// **Consumer (try_pop):**
// 1. Load `head` with Relaxed (only consumer writes head)
// 2. Read `cached_tail` (UnsafeCell, consumer-only)
// 3. If the cache says empty: load `tail` with Acquire and refresh the cache
// 4. Move the value out of slot `head & mask` (plain read)
// 5. Store `head + 1` with Release (hands the slot back to the producer)
//
// The Release store in step 5 of one side pairs with the Acquire load in
// step 3 of the other. That single edge orders "slot written" before "slot
// read" and "slot vacated" before "slot overwritten". No other fence exists.
//
// ## Single-Writer Fields
//
// - `tail`, `cached_head`: written by the producer only
// - `head`, `cached_tail`: written by the consumer only
// - `buffer[p & mask]`: written by the producer while `p` is at or past
//   `tail`, read by the consumer while `head <= p < tail`
//
// A stale cache can only under-report free space (producer) or available
// items (consumer), so it never admits an unsafe access; it only forces a
// refresh. An operation reports full/empty only after a fresh Acquire load.
//
// =============================================================================

/// Fields touched by the producer on every push.
struct ProducerSide {
    /// Write position (written by producer, read by consumer)
    tail: AtomicU64,
    /// Producer's cached view of head (avoids cross-core reads)
    cached_head: UnsafeCell<u64>,
}

/// Fields touched by the consumer on every pop.
struct ConsumerSide {
    /// Read position (written by consumer, read by producer)
    head: AtomicU64,
    /// Consumer's cached view of tail (avoids cross-core reads)
    cached_tail: UnsafeCell<u64>,
}

/// SPSC ring buffer.
///
/// A fixed-capacity single-producer single-consumer queue with lock-free,
/// non-blocking operations and no allocation after construction.
///
/// The producer and consumer operations are `unsafe` on the ring itself
/// because correctness depends on there being exactly one caller per role.
/// [`Ring::split`] (or [`crate::channel`]) returns a [`Producer`] and
/// [`Consumer`] that uphold this contract by construction.
///
/// # Memory Layout
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ Producer hot (CachePadded)                               │
/// │   tail: AtomicU64        ← Producer writes, Consumer reads│
/// │   cached_head: u64       ← Producer-local cache           │
/// ├──────────────────────────────────────────────────────────┤
/// │ Consumer hot (CachePadded)                               │
/// │   head: AtomicU64        ← Consumer writes, Producer reads│
/// │   cached_tail: u64       ← Consumer-local cache           │
/// ├──────────────────────────────────────────────────────────┤
/// │ Cold, read-only after construction                       │
/// │   mask, config, metrics, buffer pointer                  │
/// └──────────────────────────────────────────────────────────┘
/// ```
#[repr(C)]
pub struct Ring<T> {
    // === PRODUCER HOT ===
    producer: CachePadded<ProducerSide>,

    // === CONSUMER HOT ===
    consumer: CachePadded<ConsumerSide>,

    // === COLD STATE ===
    /// `capacity - 1`, as u64 so positions never need narrowing before masking
    mask: u64,
    config: Config,
    /// Per-role counters, each group on its own cache line
    metrics: Metrics,

    // === DATA BUFFER ===
    /// Fixed-size slot storage. `Box<[_]>` rather than `Vec` because the
    /// length never changes after construction.
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// Safety: Ring is Send + Sync as long as T is Send.
// Values move from the producer thread to the consumer thread, never shared;
// every slot access is ordered by the tail/head acquire-release handshake.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T> Ring<T> {
    /// Creates a new ring buffer with the given configuration.
    ///
    /// This is the only allocation the ring ever performs.
    pub fn new(config: Config) -> Self {
        Self::starting_at(config, 0)
    }

    /// Creates a ring with `capacity` slots.
    ///
    /// Fails if `capacity` is zero or not a power of two.
    pub fn with_capacity(capacity: usize) -> Result<Self, RingError> {
        Config::with_capacity(capacity).map(Self::new)
    }

    /// Builds an empty ring whose positions start at `position` instead of 0.
    fn starting_at(config: Config, position: u64) -> Self {
        let capacity = config.capacity();
        let buffer = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Box<[_]>>();

        trace_debug!(
            capacity,
            slot_bytes = std::mem::size_of::<T>(),
            metrics = config.metrics_enabled(),
            "allocated spsc ring"
        );

        Self {
            producer: CachePadded::new(ProducerSide {
                tail: AtomicU64::new(position),
                cached_head: UnsafeCell::new(position),
            }),
            consumer: CachePadded::new(ConsumerSide {
                head: AtomicU64::new(position),
                cached_tail: UnsafeCell::new(position),
            }),
            mask: config.mask() as u64,
            config,
            metrics: Metrics::new(),
            buffer,
        }
    }

    /// Splits the ring into its producer and consumer handles.
    pub fn split(self) -> (Producer<T>, Consumer<T>) {
        let ring = Arc::new(self);
        (Producer::new(Arc::clone(&ring)), Consumer::new(ring))
    }

    // ---------------------------------------------------------------------
    // CONSTANTS & STATUS
    // ---------------------------------------------------------------------

    /// Returns the ring buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    /// Returns the configuration the ring was built with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    fn capacity_u64(&self) -> u64 {
        self.mask + 1
    }

    /// Returns the number of values currently in the ring.
    ///
    /// The two positions are loaded independently, not as one snapshot, so
    /// while the other side is active the result may already be stale. Use
    /// it for observability and backpressure heuristics, not for correctness.
    #[inline]
    pub fn len(&self) -> usize {
        // head first: tail can only have moved further ahead by the time it is
        // read, so the difference never underflows.
        let head = self.consumer.head.load(Ordering::Acquire);
        let tail = self.producer.tail.load(Ordering::Acquire);
        tail.wrapping_sub(head).min(self.capacity_u64()) as usize
    }

    /// Returns the number of free slots. Same staleness caveat as [`len`].
    ///
    /// [`len`]: Ring::len
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Returns true if the ring is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the ring is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.metrics_enabled() {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    /// Runs `f` with a pointer to the slot for `position`.
    #[inline]
    fn with_slot<R>(&self, position: u64, f: impl FnOnce(*mut MaybeUninit<T>) -> R) -> R {
        let idx = (position & self.mask) as usize;
        // SAFETY: idx <= mask < buffer.len()
        unsafe { self.buffer.get_unchecked(idx) }.with_mut(f)
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Attempts to enqueue `item` without blocking.
    ///
    /// Returns `Err(Full(item))`, with nothing changed, when every slot is
    /// occupied.
    ///
    /// Fast path uses the cached head to avoid cross-core reads.
    /// Slow path refreshes the cache only when the ring looks full.
    ///
    /// # Safety
    ///
    /// Must only ever be called from one thread at a time: the single
    /// producer. Two concurrent callers race on the same slot and `tail`.
    #[inline]
    pub unsafe fn try_push(&self, item: T) -> Result<(), Full<T>> {
        let capacity = self.capacity_u64();
        let tail = self.producer.tail.load(Ordering::Relaxed);

        // SAFETY: cached_head is only accessed by the producer.
        let mut head = self.producer.cached_head.with(|p| *p);

        if tail.wrapping_sub(head) == capacity {
            // Slow path: refresh cache
            head = self.consumer.head.load(Ordering::Acquire);
            self.producer.cached_head.with_mut(|p| *p = head);

            if tail.wrapping_sub(head) == capacity {
                if self.config.metrics_enabled() {
                    self.metrics.add_full_rejection();
                }
                return Err(Full(item));
            }
        }

        // SAFETY: The slot at `tail` is free:
        // 1. tail - head < capacity, so the consumer has vacated it
        // 2. The Acquire load of head (now or when the cache was filled)
        //    synchronizes with the consumer's Release store that vacated it
        // 3. The consumer cannot observe it until the Release store below
        self.with_slot(tail, |slot| slot.write(MaybeUninit::new(item)));

        let new_tail = tail.wrapping_add(1);
        debug_assert_bounded_count!(new_tail, head, capacity);
        self.producer.tail.store(new_tail, Ordering::Release);

        if self.config.metrics_enabled() {
            self.metrics.add_messages_sent(1);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Attempts to dequeue the oldest value without blocking.
    ///
    /// Returns `None` when the ring is empty.
    ///
    /// # Safety
    ///
    /// Must only ever be called from one thread at a time: the single
    /// consumer. This also covers [`consume_batch`] and [`consume_up_to`].
    ///
    /// [`consume_batch`]: Ring::consume_batch
    /// [`consume_up_to`]: Ring::consume_up_to
    #[inline]
    pub unsafe fn try_pop(&self) -> Option<T> {
        let head = self.consumer.head.load(Ordering::Relaxed);

        // SAFETY: cached_tail is only accessed by the consumer.
        let mut tail = self.consumer.cached_tail.with(|p| *p);

        if tail == head {
            // Slow path: refresh cache
            tail = self.producer.tail.load(Ordering::Acquire);
            self.consumer.cached_tail.with_mut(|p| *p = tail);

            if tail == head {
                if self.config.metrics_enabled() {
                    self.metrics.add_empty_poll();
                }
                return None;
            }
        }

        debug_assert_initialized_read!(head, head, tail);

        // SAFETY: The slot at `head` holds an initialized value:
        // 1. head < tail, so the producer has published it
        // 2. The Acquire load of tail synchronizes with that Release store
        // 3. assume_init_read moves the value out; the slot is logically
        //    uninitialized again once head advances below
        let item = self.with_slot(head, |slot| (*slot).assume_init_read());

        let new_head = head.wrapping_add(1);
        debug_assert_head_not_past_tail!(head, new_head, tail);
        self.consumer.head.store(new_head, Ordering::Release);

        if self.config.metrics_enabled() {
            self.metrics.add_messages_received(1);
        }
        Some(item)
    }

    // ---------------------------------------------------------------------
    // BATCH CONSUMPTION
    // ---------------------------------------------------------------------

    /// Moves ALL currently readable values into `handler`, in FIFO order,
    /// with a single head update.
    ///
    /// Amortizes the atomic traffic of `try_pop` over the whole batch.
    /// Returns the number of values handed out.
    ///
    /// # Safety
    ///
    /// Consumer-only, see [`Ring::try_pop`].
    pub unsafe fn consume_batch<F>(&self, handler: F) -> usize
    where
        F: FnMut(T),
    {
        self.consume_up_to(usize::MAX, handler)
    }

    /// Moves at most `max_items` values into `handler` with a single head
    /// update.
    ///
    /// Useful when draining everything at once could stall the consumer for
    /// too long. If `handler` panics, head still advances past every value
    /// already handed out, so nothing is dropped twice.
    ///
    /// # Safety
    ///
    /// Consumer-only, see [`Ring::try_pop`].
    pub unsafe fn consume_up_to<F>(&self, max_items: usize, mut handler: F) -> usize
    where
        F: FnMut(T),
    {
        if max_items == 0 {
            return 0;
        }

        let head = self.consumer.head.load(Ordering::Relaxed);
        let tail = self.producer.tail.load(Ordering::Acquire);
        self.consumer.cached_tail.with_mut(|p| *p = tail);

        let avail = tail.wrapping_sub(head);
        if avail == 0 {
            if self.config.metrics_enabled() {
                self.metrics.add_empty_poll();
            }
            return 0;
        }

        let to_consume = avail.min(max_items as u64);
        let mut batch = HeadAdvance {
            ring: self,
            head,
            tail,
            consumed: 0,
        };

        // No atomics inside the loop.
        while batch.consumed < to_consume {
            let pos = head.wrapping_add(batch.consumed);
            debug_assert_initialized_read!(pos, head, tail);

            // SAFETY: Same argument as try_pop: pos lies in [head, tail),
            // which the Acquire load of tail made visible. The value is moved
            // out exactly once because `consumed` is bumped before the
            // handler runs.
            let item = self.with_slot(pos, |slot| (*slot).assume_init_read());
            batch.consumed += 1;
            handler(item);
        }

        batch.consumed as usize
    }
}

/// Publishes the consumer's progress through a batch when dropped, including
/// on unwind out of a batch handler.
struct HeadAdvance<'a, T> {
    ring: &'a Ring<T>,
    head: u64,
    tail: u64,
    consumed: u64,
}

impl<T> Drop for HeadAdvance<'_, T> {
    fn drop(&mut self) {
        let new_head = self.head.wrapping_add(self.consumed);
        debug_assert_head_not_past_tail!(self.head, new_head, self.tail);

        // Single atomic update for the batch
        self.ring.consumer.head.store(new_head, Ordering::Release);

        if self.ring.config.metrics_enabled() {
            self.ring.metrics.add_messages_received(self.consumed);
            self.ring.metrics.add_batches_received(1);
        }
    }
}

impl<T> Drop for Ring<T> {
    fn drop(&mut self) {
        // Drop all values still resident in the ring
        let head = self.consumer.head.load(Ordering::Relaxed);
        let tail = self.producer.tail.load(Ordering::Relaxed);
        let count = tail.wrapping_sub(head);

        if count > 0 {
            trace_debug!(count, "dropping spsc ring with resident values");

            for i in 0..count {
                // SAFETY: positions in [head, tail) are initialized and, with
                // `&mut self`, no other thread can touch them.
                self.with_slot(head.wrapping_add(i), |slot| unsafe {
                    (*slot).assume_init_drop();
                });
            }
        }
    }
}
