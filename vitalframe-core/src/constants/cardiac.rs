//! PPG Acquisition and Heart-Rate Estimator Defaults
//!
//! The pulse sensor (MAX30102 class) samples internally at 400 Hz and
//! averages 8 samples per FIFO entry, so the host sees 50 samples per
//! second. All estimator windows below are expressed in milliseconds and
//! converted to sample counts with this rate.

/// Internal sensor sample rate (Hz).
pub const PPG_SENSOR_RATE_HZ: u32 = 400;

/// On-chip FIFO averaging factor.
pub const PPG_FIFO_AVERAGE: u32 = 8;

/// Effective PPG acquisition rate seen by the host (Hz).
///
/// 400 Hz / 8 = 50 Hz, one sample every 20 ms.
pub const PPG_SAMPLE_RATE_HZ: u32 = PPG_SENSOR_RATE_HZ / PPG_FIFO_AVERAGE;

/// Moving-average window applied to raw IR samples (samples).
///
/// 5 samples at 50 Hz = 100 ms, enough to flatten LED flicker without
/// blunting the systolic peak.
pub const HR_SMOOTHING_WINDOW: usize = 5;

/// Window over which the adaptive peak threshold is derived (ms).
pub const HR_THRESHOLD_WINDOW_MS: u32 = 3000;

/// Adaptive threshold position between window min and max.
///
/// 0.5 puts the threshold halfway up the pulse waveform.
pub const HR_THRESHOLD_RATIO: f32 = 0.5;

/// Warm-up before any estimate is trusted (ms).
///
/// The host loop of the original deployment collected for 5 s with the
/// finger on the sensor before streaming.
pub const HR_WARMUP_MS: u32 = 5000;

/// Period at which the published BPM is refreshed (ms).
pub const HR_RECOMPUTE_PERIOD_MS: u32 = 2000;

/// Minimum spacing between two accepted peaks (ms).
///
/// 300 ms corresponds to 200 BPM; anything closer is the same pulse
/// (dicrotic notch, motion) counted twice.
pub const HR_REFRACTORY_MS: u32 = 300;

/// Lowest plausible heart rate (BPM).
pub const HR_MIN_BPM: u16 = 30;

/// Highest plausible heart rate (BPM).
pub const HR_MAX_BPM: u16 = 220;

/// Number of inter-beat intervals averaged into the published BPM.
pub const HR_INTERVAL_HISTORY: usize = 5;

/// Minimum peak prominence above the window minimum (raw counts).
///
/// Smaller swings are treated as noise rather than beats.
pub const HR_MIN_PEAK_AMPLITUDE: f32 = 20.0;

/// Raw IR level below which no finger is considered present (counts).
///
/// With the LEDs at medium amplitude a fingertip reflects well above
/// 50 000 counts; an uncovered sensor reads a few thousand.
pub const FINGER_PRESENT_IR: u32 = 50_000;
