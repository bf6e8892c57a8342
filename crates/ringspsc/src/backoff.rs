use std::hint;
use std::thread;

/// Caller-side retry pacing for `try_push` / `try_pop` loops.
///
/// The ring itself never waits. A retry loop that hits `Full` or empty can use
/// this to back off progressively: spin with PAUSE hints, then yield the time
/// slice to the OS, then report that patience is exhausted so the caller can
/// drop, park, or do other work.
///
/// ```
/// use ringspsc_rs::Backoff;
///
/// let (mut producer, _consumer) = ringspsc_rs::with_capacity::<u64>(1).unwrap();
/// producer.push(1);
///
/// let mut backoff = Backoff::new();
/// let mut value = 2;
/// while let Err(full) = producer.try_push(value) {
///     if backoff.is_completed() {
///         break; // still full: shed the value
///     }
///     value = full.into_inner();
///     backoff.snooze();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Backoff {
    step: u32,
    spin_limit: u32,
    yield_limit: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6; // 2^6 = 64 spins max before yielding
    const YIELD_LIMIT: u32 = 10; // Then give up

    /// Creates a new backoff instance.
    #[inline]
    pub fn new() -> Self {
        Self::with_limits(Self::SPIN_LIMIT, Self::YIELD_LIMIT)
    }

    /// Creates a backoff that spins for `spin_limit` steps (doubling the spin
    /// count each step, capped at `2^spin_limit`) and completes after
    /// `yield_limit` steps.
    #[inline]
    pub fn with_limits(spin_limit: u32, yield_limit: u32) -> Self {
        Self {
            step: 0,
            spin_limit: spin_limit.min(16),
            yield_limit: yield_limit.max(spin_limit),
        }
    }

    /// Light spin with PAUSE hints.
    #[inline]
    pub fn spin(&mut self) {
        for _ in 0..1u32 << self.step.min(self.spin_limit) {
            hint::spin_loop();
        }
        if self.step <= self.spin_limit {
            self.step += 1;
        }
    }

    /// Heavier backoff: spin while below the spin limit, then yield.
    #[inline]
    pub fn snooze(&mut self) {
        if self.step <= self.spin_limit {
            self.spin();
        } else {
            thread::yield_now();
            if self.step <= self.yield_limit {
                self.step += 1;
            }
        }
    }

    /// Check if we've exhausted patience.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.step > self.yield_limit
    }

    /// Reset for next wait cycle (call after a successful operation).
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}
