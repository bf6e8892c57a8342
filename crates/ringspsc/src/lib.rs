//! RingSPSC - Lock-Free Single-Producer Single-Consumer Ring Buffer
//!
//! A fixed-capacity circular buffer for handing values of one type from
//! exactly one producer thread to exactly one consumer thread. After
//! construction nothing is allocated, nothing is locked and nothing blocks:
//! every operation either completes or reports `Full` / empty immediately.
//!
//! # Key Features
//!
//! - Power-of-two capacity, slot index is `position & (capacity - 1)`
//! - Producer and consumer counters on separate cache lines (no false sharing)
//! - One acquire/release handshake per operation, role-local cached positions
//! - `Producer` / `Consumer` handles make the SPSC contract a compile-time fact
//! - Batch consumption API (single head update for N items)
//!
//! # Example
//!
//! ```
//! use ringspsc_rs::{with_capacity, Full};
//!
//! let (mut producer, mut consumer) = with_capacity::<u64>(4).unwrap();
//!
//! for i in 0..4 {
//!     producer.try_push(i).unwrap();
//! }
//! // The rejected value is handed back to the caller.
//! assert_eq!(producer.try_push(99), Err(Full(99)));
//!
//! assert_eq!(consumer.try_pop(), Some(0));
//! assert_eq!(consumer.len(), 3);
//! assert_eq!(consumer.available(), 1);
//!
//! let mut rest = Vec::new();
//! consumer.consume_batch(|v| rest.push(v));
//! assert_eq!(rest, vec![1, 2, 3]);
//! assert_eq!(consumer.try_pop(), None);
//! ```
//!
//! # Feature Flags
//!
//! - `tracing`: emit `tracing` events for ring allocation, rejected
//!   capacities and dropping a ring that still holds values
//!   (`cargo test --features tracing --test tracing_tests`)
//! - `loom`: swap atomics, `Arc` and slot cells for loom's model-checked
//!   versions (`cargo test --features loom --test loom_tests --release`)

// Tracing macros - no-op when feature disabled
#[cfg(feature = "tracing")]
macro_rules! trace_debug { ($($arg:tt)*) => { tracing::debug!($($arg)*) } }
#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug { ($($arg:tt)*) => {} }

#[cfg(feature = "tracing")]
macro_rules! trace_warn { ($($arg:tt)*) => { tracing::warn!($($arg)*) } }
#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn { ($($arg:tt)*) => {} }

mod backoff;
mod channel;
mod config;
mod error;
mod invariants;
mod metrics;
mod ring;
mod sync;

pub use backoff::Backoff;
pub use channel::{channel, with_capacity, Consumer, Producer};
pub use config::{Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use error::{Full, RingError};
pub use metrics::MetricsSnapshot;
pub use ring::Ring;
