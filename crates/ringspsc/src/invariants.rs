//! Debug assertion macros for ring buffer invariants.
//!
//! Only active in debug builds (`debug_assert!`), so there is zero overhead in
//! release builds. Positions are free-running `u64` counters that may wrap, so
//! every comparison is done on wrapping distances rather than raw values.

// =============================================================================
// Bounded Count
// =============================================================================

/// Assert that the occupied count does not exceed capacity.
///
/// **Invariant**: `0 ≤ (tail - head) ≤ capacity` (wrapping)
///
/// Used in: `try_push()` before publishing the new tail
macro_rules! debug_assert_bounded_count {
    ($tail:expr, $head:expr, $capacity:expr) => {
        debug_assert!(
            $tail.wrapping_sub($head) <= $capacity,
            "bounded count violated: tail {} is {} slots ahead of head {} (capacity {})",
            $tail,
            $tail.wrapping_sub($head),
            $head,
            $capacity
        )
    };
}

/// Assert that the consumer does not advance past the producer.
///
/// **Invariant**: `new_head - head ≤ tail - head` (wrapping)
///
/// Used in: `try_pop()` and batch consumption before publishing the new head
macro_rules! debug_assert_head_not_past_tail {
    ($head:expr, $new_head:expr, $tail:expr) => {
        debug_assert!(
            $new_head.wrapping_sub($head) <= $tail.wrapping_sub($head),
            "advancing head from {} to {} beyond tail {}",
            $head,
            $new_head,
            $tail
        )
    };
}

// =============================================================================
// Initialized Range Check
// =============================================================================

/// Assert that we're reading from an initialized slot.
///
/// **Invariant**: `slot(pos) is initialized ⟺ head ≤ pos < tail` (wrapping)
///
/// Used in: `try_pop()` and batch consumption before `assume_init_read()`
macro_rules! debug_assert_initialized_read {
    ($pos:expr, $head:expr, $tail:expr) => {
        debug_assert!(
            $pos.wrapping_sub($head) < $tail.wrapping_sub($head),
            "reading slot at position {} outside initialized range [{}, {})",
            $pos,
            $head,
            $tail
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_head_not_past_tail;
pub(crate) use debug_assert_initialized_read;
