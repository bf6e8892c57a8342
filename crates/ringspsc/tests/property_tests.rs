//! Property-based tests for the ring invariants.
//!
//! Every test drives a real `Producer`/`Consumer` pair through a random
//! sequence of operations and checks it against a `VecDeque` model or against
//! the counting laws the ring must satisfy.

#![cfg(not(feature = "loom"))]

use proptest::prelude::*;
use ringspsc_rs::{channel, with_capacity, Config, Full, RingError};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Push(u32),
    Pop,
    Batch(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u32>().prop_map(Op::Push),
        2 => Just(Op::Pop),
        1 => (0usize..8).prop_map(Op::Batch),
    ]
}

// =============================================================================
// Construction: power-of-two enforcement
// =============================================================================

proptest! {
    /// Construction succeeds exactly for non-zero powers of two.
    #[test]
    fn prop_capacity_validation(capacity in 0usize..100_000) {
        match with_capacity::<u8>(capacity) {
            Ok((producer, _consumer)) => {
                prop_assert!(capacity.is_power_of_two());
                prop_assert_eq!(producer.capacity(), capacity);
                prop_assert_eq!(producer.len(), 0);
            }
            Err(RingError::ZeroCapacity) => {
                prop_assert_eq!(capacity, 0);
            }
            Err(RingError::NotPowerOfTwo { requested }) => {
                prop_assert_eq!(requested, capacity);
                prop_assert!(capacity != 0 && !capacity.is_power_of_two());
            }
        }
    }
}

// =============================================================================
// Model check: the ring behaves like a bounded VecDeque
// =============================================================================

proptest! {
    /// Any interleaving of push / pop / batch matches a bounded FIFO model.
    #[test]
    fn prop_matches_bounded_fifo_model(
        ring_bits in 0u8..5,
        ops in prop::collection::vec(op_strategy(), 1..200),
    ) {
        let (mut producer, mut consumer) = channel::<u32>(Config::new(ring_bits, false));
        let capacity = producer.capacity();
        let mut model = VecDeque::with_capacity(capacity);

        for op in ops {
            match op {
                Op::Push(v) => {
                    let result = producer.try_push(v);
                    if model.len() < capacity {
                        prop_assert_eq!(result, Ok(()));
                        model.push_back(v);
                    } else {
                        prop_assert_eq!(result, Err(Full(v)));
                    }
                }
                Op::Pop => {
                    prop_assert_eq!(consumer.try_pop(), model.pop_front());
                }
                Op::Batch(max) => {
                    let mut got = Vec::new();
                    let n = consumer.consume_up_to(max, |v| got.push(v));
                    let take = max.min(model.len());
                    let expected: Vec<u32> = model.drain(..take).collect();
                    prop_assert_eq!(n, expected.len());
                    prop_assert_eq!(got, expected);
                }
            }

            prop_assert_eq!(consumer.len(), model.len());
            prop_assert_eq!(producer.available(), capacity - model.len());
        }
    }
}

// =============================================================================
// Bounded count and conservation
// =============================================================================

proptest! {
    /// `pushed == popped + len` and `0 <= len <= capacity` after every step.
    #[test]
    fn prop_conservation(
        ring_bits in 0u8..6,
        ops in prop::collection::vec(prop::bool::ANY, 1..300),
    ) {
        let (mut producer, mut consumer) = channel::<u64>(Config::new(ring_bits, true));
        let capacity = producer.capacity();
        let mut pushed = 0u64;
        let mut popped = 0u64;

        for write_op in ops {
            if write_op {
                if producer.try_push(pushed).is_ok() {
                    pushed += 1;
                }
            } else if let Some(v) = consumer.try_pop() {
                prop_assert_eq!(v, popped, "out of order");
                popped += 1;
            }

            let len = consumer.len();
            prop_assert!(len <= capacity, "len {} > capacity {}", len, capacity);
            prop_assert_eq!(pushed, popped + len as u64);
        }

        let metrics = producer.metrics();
        prop_assert_eq!(metrics.messages_sent, pushed);
        prop_assert_eq!(metrics.messages_received, popped);
        prop_assert_eq!(metrics.in_flight(), consumer.len() as u64);
    }
}

// =============================================================================
// FIFO law and observability
// =============================================================================

proptest! {
    /// Up to `capacity` values pushed with no pops come back in order, and
    /// `len` / `available` track the count exactly.
    #[test]
    fn prop_fifo_law(
        ring_bits in 0u8..7,
        values in prop::collection::vec(any::<i64>(), 0..64),
    ) {
        let (mut producer, mut consumer) = channel::<i64>(Config::new(ring_bits, false));
        let capacity = producer.capacity();
        let accepted: Vec<i64> = values.iter().copied().take(capacity).collect();

        for (k, v) in accepted.iter().enumerate() {
            prop_assert!(producer.try_push(*v).is_ok());
            prop_assert_eq!(consumer.len(), k + 1);
            prop_assert_eq!(consumer.available(), capacity - (k + 1));
        }
        if values.len() > capacity {
            prop_assert!(producer.try_push(0).is_err());
        }

        for v in &accepted {
            prop_assert_eq!(consumer.try_pop(), Some(*v));
        }
        prop_assert_eq!(consumer.try_pop(), None);
    }

    /// Repeated fill/drain rounds keep order across slot-index wraparound.
    #[test]
    fn prop_wraparound_rounds(
        ring_bits in 0u8..4,
        rounds in 1usize..64,
        offset in 0usize..16,
    ) {
        let (mut producer, mut consumer) = channel::<usize>(Config::new(ring_bits, false));
        let capacity = producer.capacity();

        // Shift the start so rounds do not all begin at slot 0.
        for i in 0..offset.min(capacity) {
            prop_assert!(producer.try_push(i).is_ok());
            prop_assert_eq!(consumer.try_pop(), Some(i));
        }

        for round in 0..rounds {
            for i in 0..capacity {
                prop_assert!(producer.try_push(round * 1000 + i).is_ok());
            }
            prop_assert!(producer.is_full());
            for i in 0..capacity {
                prop_assert_eq!(consumer.try_pop(), Some(round * 1000 + i));
            }
            prop_assert!(consumer.is_empty());
        }
    }
}
