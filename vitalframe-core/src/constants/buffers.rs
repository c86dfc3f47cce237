//! Fixed Storage Capacities
//!
//! Runtime windows are chosen by configuration but must fit these inline
//! arrays. Sizes assume the 50 Hz PPG rate with headroom.

/// Maximum number of channels in the channel table.
pub const MAX_CHANNELS: usize = 8;

/// Storage for the PPG moving-average window (samples).
pub const MAX_SMOOTHING_WINDOW: usize = 32;

/// Storage for the adaptive-threshold window (samples), 5 s at 50 Hz.
pub const MAX_THRESHOLD_WINDOW: usize = 256;

/// Storage for the inter-beat interval history.
pub const MAX_INTERVAL_HISTORY: usize = 16;
