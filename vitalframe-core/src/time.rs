//! Time management for the tick loop
//!
//! The core never reads a clock on its own: every operation takes `now` as an
//! argument. Clocks only matter to the host loop that decides when to tick:
//! - Monotonic hardware/OS counter (real deployments)
//! - Manual clock (tests, replay)

/// Timestamp in milliseconds since boot (monotonic)
pub type Timestamp = u64;

/// Source of time for the host loop
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Get precision in milliseconds
    fn precision_ms(&self) -> u32;
}

/// Milliseconds elapsed from `earlier` to `later`, zero if the clock went backwards
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

/// Monotonic time source backed by `std::time::Instant`
///
/// Starts at 0 when created, always increases
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Clock starting at 0 now
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Hand-driven time source for testing and replay
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    timestamp: core::cell::Cell<Timestamp>,
}

impl ManualClock {
    /// Clock reading `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: core::cell::Cell::new(timestamp) }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get() + ms);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(1000);
        assert_eq!(clock.now(), 1000);

        clock.advance(500);
        assert_eq!(clock.now(), 1500);

        clock.set(10);
        assert_eq!(clock.now(), 10);
    }

    #[test]
    fn elapsed_never_negative() {
        assert_eq!(elapsed_ms(1000, 1600), 600);
        assert_eq!(elapsed_ms(1600, 1000), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_clock_starts_near_zero() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
        assert!(first < 1000);
    }
}
