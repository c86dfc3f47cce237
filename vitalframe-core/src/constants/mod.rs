//! Constants for vitalframe
//!
//! Every default and limit used by the configuration layer lives here with a
//! note on where the number comes from. None of them are hard invariants:
//! the thresholds are starting points to be tuned empirically on real
//! hardware, and all of them can be overridden through
//! [`MonitorConfig`](crate::config::MonitorConfig).
//!
//! ## Organization
//!
//! - **Cardiac**: PPG acquisition and heart-rate estimator defaults
//! - **Sensors**: ADC scaling and EMG signal assessment thresholds
//! - **Timing**: master tick and per-channel update periods
//! - **Buffers**: fixed storage capacities (upper bounds for runtime windows)

/// PPG acquisition and heart-rate estimation defaults.
pub mod cardiac;

/// ADC scaling and EMG assessment thresholds.
pub mod sensors;

/// Master tick and channel update periods.
pub mod timing;

/// Fixed storage capacities for windows and tables.
pub mod buffers;

pub use cardiac::{
    PPG_SAMPLE_RATE_HZ, HR_RECOMPUTE_PERIOD_MS, HR_WARMUP_MS,
    HR_REFRACTORY_MS, HR_MIN_BPM, HR_MAX_BPM, FINGER_PRESENT_IR,
};

pub use timing::{
    MASTER_TICK_MS, MS_PER_SECOND, SECONDS_PER_MINUTE,
};

pub use buffers::{
    MAX_CHANNELS, MAX_SMOOTHING_WINDOW, MAX_THRESHOLD_WINDOW,
    MAX_INTERVAL_HISTORY,
};
