use crate::sync::Arc;
use crate::{Backoff, Config, Full, MetricsSnapshot, Ring, RingError};

/// Creates a ring from `config` and returns its two role handles.
pub fn channel<T>(config: Config) -> (Producer<T>, Consumer<T>) {
    Ring::new(config).split()
}

/// Creates a ring with `capacity` slots and returns its two role handles.
///
/// Fails if `capacity` is zero or not a power of two.
pub fn with_capacity<T>(capacity: usize) -> Result<(Producer<T>, Consumer<T>), RingError> {
    Ring::with_capacity(capacity).map(Ring::split)
}

/// Write half of a ring.
///
/// There is exactly one `Producer` per ring: it is not `Clone`, and pushing
/// takes `&mut self`. Move it to the producer thread.
pub struct Producer<T> {
    ring: Arc<Ring<T>>,
}

/// Read half of a ring.
///
/// There is exactly one `Consumer` per ring: it is not `Clone`, and popping
/// takes `&mut self`. Move it to the consumer thread.
pub struct Consumer<T> {
    ring: Arc<Ring<T>>,
}

impl<T> Producer<T> {
    pub(crate) fn new(ring: Arc<Ring<T>>) -> Self {
        Self { ring }
    }

    /// Attempts to enqueue `item` without blocking.
    ///
    /// On a full ring the value comes back in `Err(Full(item))`.
    #[inline]
    pub fn try_push(&mut self, item: T) -> Result<(), Full<T>> {
        // SAFETY: this handle is the ring's only producer and `&mut self`
        // rules out concurrent calls through it.
        unsafe { self.ring.try_push(item) }
    }

    /// Send a single item (convenience).
    ///
    /// Returns `true` if the item was enqueued, `false` if the ring was full,
    /// in which case the item is dropped.
    ///
    /// # Example
    /// ```
    /// let (mut producer, _consumer) = ringspsc_rs::with_capacity::<u32>(1).unwrap();
    /// assert!(producer.push(42));
    /// if !producer.push(43) {
    ///     // Ring is full, handle backpressure
    /// }
    /// ```
    #[inline]
    pub fn push(&mut self, item: T) -> bool {
        self.try_push(item).is_ok()
    }

    /// Retries `try_push` with adaptive backoff. Spins, yields, then gives up
    /// and hands the value back.
    pub fn push_with_backoff(&mut self, item: T) -> Result<(), Full<T>> {
        let mut backoff = Backoff::new();
        let mut item = item;
        loop {
            match self.try_push(item) {
                Ok(()) => return Ok(()),
                Err(full) if backoff.is_completed() => return Err(full),
                Err(Full(rejected)) => {
                    item = rejected;
                    backoff.snooze();
                }
            }
        }
    }
}

impl<T> Consumer<T> {
    pub(crate) fn new(ring: Arc<Ring<T>>) -> Self {
        Self { ring }
    }

    /// Attempts to dequeue the oldest value without blocking.
    ///
    /// Returns `None` when the ring is empty.
    #[inline]
    pub fn try_pop(&mut self) -> Option<T> {
        // SAFETY: this handle is the ring's only consumer and `&mut self`
        // rules out concurrent calls through it.
        unsafe { self.ring.try_pop() }
    }

    /// Retries `try_pop` with adaptive backoff. Spins, yields, then gives up.
    pub fn pop_with_backoff(&mut self) -> Option<T> {
        let mut backoff = Backoff::new();
        loop {
            if let Some(item) = self.try_pop() {
                return Some(item);
            }
            if backoff.is_completed() {
                return None;
            }
            backoff.snooze();
        }
    }

    /// Process ALL available items with a single head update.
    ///
    /// The handler receives ownership of each item, oldest first.
    ///
    /// # Example
    ///
    /// ```
    /// let (mut producer, mut consumer) = ringspsc_rs::with_capacity::<String>(8).unwrap();
    /// producer.try_push("a".to_string()).unwrap();
    /// producer.try_push("b".to_string()).unwrap();
    ///
    /// // Zero-copy transfer into a Vec
    /// let mut batch = Vec::new();
    /// assert_eq!(consumer.consume_batch(|item| batch.push(item)), 2);
    /// assert_eq!(batch, ["a", "b"]);
    /// ```
    pub fn consume_batch<F>(&mut self, handler: F) -> usize
    where
        F: FnMut(T),
    {
        // SAFETY: sole consumer, see `try_pop`.
        unsafe { self.ring.consume_batch(handler) }
    }

    /// Consume up to `max_items` with a single head update.
    pub fn consume_up_to<F>(&mut self, max_items: usize, handler: F) -> usize
    where
        F: FnMut(T),
    {
        // SAFETY: sole consumer, see `try_pop`.
        unsafe { self.ring.consume_up_to(max_items, handler) }
    }
}

// Read-only queries shared by both handles.
macro_rules! impl_observers {
    ($handle:ident) => {
        impl<T> $handle<T> {
            /// Returns the ring buffer capacity.
            #[inline]
            pub fn capacity(&self) -> usize {
                self.ring.capacity()
            }

            /// Approximate number of queued values, see [`Ring::len`].
            #[inline]
            pub fn len(&self) -> usize {
                self.ring.len()
            }

            /// Approximate number of free slots, see [`Ring::available`].
            #[inline]
            pub fn available(&self) -> usize {
                self.ring.available()
            }

            #[inline]
            pub fn is_empty(&self) -> bool {
                self.ring.is_empty()
            }

            #[inline]
            pub fn is_full(&self) -> bool {
                self.ring.is_full()
            }

            /// Get a snapshot of metrics if enabled.
            pub fn metrics(&self) -> MetricsSnapshot {
                self.ring.metrics()
            }
        }

        impl<T> std::fmt::Debug for $handle<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($handle))
                    .field("capacity", &self.capacity())
                    .field("len", &self.len())
                    .finish()
            }
        }
    };
}

impl_observers!(Producer);
impl_observers!(Consumer);
