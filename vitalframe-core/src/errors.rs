//! Error Types for Sensor Reads and Start-up Configuration
//!
//! ## Design Philosophy
//!
//! The error system follows the same rules as the rest of the crate:
//!
//! 1. **Small Size**: Variants carry only numbers and `&'static str`, so errors
//!    can be copied around the tick loop and stored in diagnostics for free.
//!
//! 2. **No Heap Allocation**: No `String` anywhere. Memory use stays
//!    deterministic on the microcontroller.
//!
//! 3. **Copy Semantics**: Errors implement `Copy` so a driver can hand one back
//!    without ownership juggling.
//!
//! ## Error Categories
//!
//! ### Transient (absorbed by the scheduler)
//! - [`ReadError`]: a channel driver could not deliver a sample this time
//!   (bus error, sensor busy, timeout). The channel keeps its last value, is
//!   marked not fresh and a diagnostic counter is incremented. Never fatal.
//!
//! ### Fatal (start-up only)
//! - [`ConfigError`]: the static configuration is unusable (zero update
//!   period, impossible BPM bounds, ...). Returned from
//!   [`Scheduler::new`](crate::scheduler::Scheduler::new) before the first
//!   tick, and the only category allowed to stop the system.
//!
//! Signal problems (no finger on the PPG sensor, implausible beats) are not
//! errors at all: the heart-rate estimator turns them into "hold" or
//! "no reading" decisions and counts them.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use vitalframe_core::{MonitorConfig, ConfigError};
//!
//! let mut config = MonitorConfig::default();
//! config.master_period_ms = 0;
//!
//! match config.validate() {
//!     Ok(()) => {}
//!     Err(ConfigError::ZeroMasterPeriod) => {
//!         // refuse to start the tick loop
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

use crate::channels::ChannelKind;

/// Result type for channel driver reads
///
/// `nb::Error::WouldBlock` means no sample is ready right now; for the PPG
/// channel it marks the end of the sensor FIFO.
pub type ReadResult<T> = nb::Result<T, ReadError>;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Transient failure reported by a channel driver
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// Bus transaction failed (NACK, arbitration lost, CRC)
    #[error("Bus error")]
    Bus,

    /// Sensor is still converting or otherwise busy
    #[error("Sensor busy")]
    Busy,

    /// Driver gave up after its own time budget
    #[error("Read timed out")]
    Timeout,

    /// Sensor did not answer at its address
    #[error("Sensor not present")]
    NotPresent,

    /// Sensor answered with something that is not a reading
    #[error("Invalid data: {reason}")]
    InvalidData {
        /// What was wrong with the reply
        reason: &'static str,
    },
}

/// Fatal configuration problem detected before the tick loop starts
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Master tick period must be positive
    #[error("Master tick period must be greater than zero")]
    ZeroMasterPeriod,

    /// A channel was configured with a zero update period
    #[error("Channel {channel:?} has a zero update period")]
    ZeroUpdatePeriod {
        /// Offending channel
        channel: ChannelKind,
    },

    /// The same channel kind appears twice
    #[error("Channel {channel:?} configured more than once")]
    DuplicateChannel {
        /// Repeated channel
        channel: ChannelKind,
    },

    /// A configured channel has no driver attached
    #[error("Channel {channel:?} has no driver")]
    MissingDriver {
        /// Channel without a driver
        channel: ChannelKind,
    },

    /// A driver was attached for a channel that is not configured
    #[error("Driver attached for unconfigured channel {channel:?}")]
    UnconfiguredDriver {
        /// Channel the driver was attached to
        channel: ChannelKind,
    },

    /// Channel table is empty
    #[error("No channels configured")]
    NoChannels,

    /// PPG drain bound must allow at least one sample per tick
    #[error("PPG drain limit must be greater than zero")]
    ZeroDrainLimit,

    /// Channel table does not fit the fixed-capacity storage
    #[error("Too many channels: {count} exceeds {max}")]
    TooManyChannels {
        /// Configured channel count
        count: usize,
        /// Storage capacity
        max: usize,
    },

    /// The pulse channel must publish on the estimator's recompute period
    #[error("Pulse channel period {channel_ms}ms differs from recompute period {recompute_ms}ms")]
    PulsePeriodMismatch {
        /// Update period configured on the pulse channel
        channel_ms: u32,
        /// Recompute period of the heart-rate estimator
        recompute_ms: u32,
    },

    /// PPG acquisition rate must be positive
    #[error("PPG sample rate must be greater than zero")]
    ZeroSampleRate,

    /// Smoothing window outside `1..=max`
    #[error("Smoothing window {size} outside 1..={max}")]
    InvalidSmoothingWindow {
        /// Requested window
        size: usize,
        /// Largest supported window
        max: usize,
    },

    /// Interval history length outside `1..=max`
    #[error("Interval history {size} outside 1..={max}")]
    InvalidIntervalHistory {
        /// Requested history length
        size: usize,
        /// Largest supported history
        max: usize,
    },

    /// A window expressed in time needs more samples than storage allows
    #[error("Window of {samples} samples exceeds capacity {max}")]
    WindowTooLong {
        /// Samples required at the configured rate
        samples: usize,
        /// Storage capacity
        max: usize,
    },

    /// BPM bounds must satisfy `0 < min < max`
    #[error("Invalid BPM range [{min}, {max}]")]
    InvalidBpmRange {
        /// Lower plausible bound
        min: u16,
        /// Upper plausible bound
        max: u16,
    },

    /// Adaptive threshold ratio must lie in `[0, 1)`
    #[error("Threshold ratio must be within [0, 1)")]
    InvalidThresholdRatio,

    /// Refractory interval would reject every plausible beat
    #[error("Refractory interval {refractory_ms}ms longer than slowest beat {max_interval_ms}ms")]
    RefractoryTooLong {
        /// Configured refractory interval
        refractory_ms: u32,
        /// Interval of the slowest plausible beat
        max_interval_ms: u32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ReadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Bus => defmt::write!(fmt, "Bus error"),
            Self::Busy => defmt::write!(fmt, "Sensor busy"),
            Self::Timeout => defmt::write!(fmt, "Read timed out"),
            Self::NotPresent => defmt::write!(fmt, "Sensor not present"),
            Self::InvalidData { reason } => defmt::write!(fmt, "Invalid data: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ZeroMasterPeriod =>
                defmt::write!(fmt, "Zero master period"),
            Self::ZeroUpdatePeriod { channel } =>
                defmt::write!(fmt, "Zero update period on {}", channel.name()),
            Self::DuplicateChannel { channel } =>
                defmt::write!(fmt, "Duplicate channel {}", channel.name()),
            Self::MissingDriver { channel } =>
                defmt::write!(fmt, "No driver for {}", channel.name()),
            Self::UnconfiguredDriver { channel } =>
                defmt::write!(fmt, "Driver for unconfigured {}", channel.name()),
            Self::NoChannels =>
                defmt::write!(fmt, "No channels"),
            Self::ZeroDrainLimit =>
                defmt::write!(fmt, "Zero PPG drain limit"),
            Self::TooManyChannels { count, max } =>
                defmt::write!(fmt, "{} channels, max {}", count, max),
            Self::PulsePeriodMismatch { channel_ms, recompute_ms } =>
                defmt::write!(fmt, "Pulse period {}ms != recompute {}ms", channel_ms, recompute_ms),
            Self::ZeroSampleRate =>
                defmt::write!(fmt, "Zero PPG sample rate"),
            Self::InvalidSmoothingWindow { size, max } =>
                defmt::write!(fmt, "Smoothing window {} outside 1..={}", size, max),
            Self::InvalidIntervalHistory { size, max } =>
                defmt::write!(fmt, "Interval history {} outside 1..={}", size, max),
            Self::WindowTooLong { samples, max } =>
                defmt::write!(fmt, "Window {} samples > {}", samples, max),
            Self::InvalidBpmRange { min, max } =>
                defmt::write!(fmt, "BPM range [{}, {}]", min, max),
            Self::InvalidThresholdRatio =>
                defmt::write!(fmt, "Threshold ratio outside [0, 1)"),
            Self::RefractoryTooLong { refractory_ms, max_interval_ms } =>
                defmt::write!(fmt, "Refractory {}ms > {}ms", refractory_ms, max_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_small_and_copy() {
        let err = ReadError::InvalidData { reason: "checksum" };
        let copy = err;
        assert_eq!(err, copy);
        assert!(core::mem::size_of::<ConfigError>() <= 24);
    }

    #[test]
    fn read_error_wraps_into_nb() {
        let result: ReadResult<u8> = Err(nb::Error::Other(ReadError::Timeout));
        assert!(matches!(result, Err(nb::Error::Other(ReadError::Timeout))));
    }
}
