use crate::RingError;

/// Configuration for `Ring` and `channel`.
///
/// Capacity is stored as a power-of-two exponent, so every `Config` describes
/// a valid ring. Use [`Config::with_capacity`] to validate a raw slot count.
///
/// The fields are private: a `Config` only comes out of a constructor that
/// checks the exponent, so it cannot be spelled out with an out-of-range one.
///
/// ```compile_fail
/// let config = ringspsc_rs::Config { ring_bits: 64, enable_metrics: false };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Ring buffer size as power of 2 (default: 16 = 64K slots)
    ring_bits: u8,
    /// Enable metrics collection (slight overhead)
    enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    ///
    /// # Panics
    ///
    /// Panics if `1 << ring_bits` does not fit in a `usize`.
    pub const fn new(ring_bits: u8, enable_metrics: bool) -> Self {
        assert!(
            (ring_bits as u32) < usize::BITS,
            "ring_bits exceeds the platform word size"
        );
        Self {
            ring_bits,
            enable_metrics,
        }
    }

    /// Builds a configuration from a slot count, rejecting zero and any
    /// value that is not a power of two.
    pub fn with_capacity(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            trace_warn!("rejected ring capacity 0");
            return Err(RingError::ZeroCapacity);
        }
        if !capacity.is_power_of_two() {
            trace_warn!(requested = capacity, "rejected non power-of-two ring capacity");
            return Err(RingError::NotPowerOfTwo {
                requested: capacity,
            });
        }
        Ok(Self::new(capacity.trailing_zeros() as u8, false))
    }

    /// Returns a copy with metrics collection switched on or off.
    pub const fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    /// Capacity exponent: the ring holds `2^ring_bits` slots.
    #[inline]
    pub const fn ring_bits(&self) -> u8 {
        self.ring_bits
    }

    /// Whether the ring keeps traffic counters.
    #[inline]
    pub const fn metrics_enabled(&self) -> bool {
        self.enable_metrics
    }

    /// Returns the capacity of the ring buffer.
    #[inline]
    pub const fn capacity(&self) -> usize {
        1 << self.ring_bits
    }

    /// Returns the mask for index wrapping.
    #[inline]
    pub const fn mask(&self) -> usize {
        self.capacity() - 1
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ring_bits: 16, // 64K slots
            enable_metrics: false,
        }
    }
}

/// Low latency configuration (4K slots, fits in L1 cache)
pub const LOW_LATENCY_CONFIG: Config = Config::new(12, false);

/// High throughput configuration (256K slots)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(18, false);
