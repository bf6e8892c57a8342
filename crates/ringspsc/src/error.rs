//! Error types for ring construction and enqueue.

use std::fmt;
use thiserror::Error;

/// Configuration errors raised while constructing a ring.
///
/// These are programmer errors: the requested capacity is rejected outright,
/// never rounded up to the next power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// A ring must have at least one slot.
    #[error("ring capacity must be greater than zero")]
    ZeroCapacity,

    /// Slot indexing masks positions with `capacity - 1`, which is only
    /// correct for powers of two.
    #[error("ring capacity must be a power of two (requested: {requested})")]
    NotPowerOfTwo {
        /// The capacity that was asked for.
        requested: usize,
    },
}

/// Returned by `try_push` when every slot is occupied.
///
/// Carries the rejected value back to the caller, who may retry, back off,
/// or drop it. A full ring is ordinary backpressure, not a failure.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
#[error("ring buffer is full")]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Recovers the value that could not be enqueued.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

// Hand-written so `Full<T>` is `Debug` (and so an `Error`) for any `T`.
impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Full").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Opaque;

    #[test]
    fn test_full_hands_value_back() {
        let err = Full(String::from("frame"));
        assert_eq!(err.to_string(), "ring buffer is full");
        assert_eq!(err.into_inner(), "frame");
    }

    #[test]
    fn test_full_is_error_without_debug_payload() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        let err = Full(Opaque);
        assert_error(&err);
        assert_eq!(format!("{:?}", err), "Full { .. }");
    }

    #[test]
    fn test_ring_error_messages() {
        assert_eq!(
            RingError::ZeroCapacity.to_string(),
            "ring capacity must be greater than zero"
        );
        assert_eq!(
            RingError::NotPowerOfTwo { requested: 10 }.to_string(),
            "ring capacity must be a power of two (requested: 10)"
        );
    }
}
