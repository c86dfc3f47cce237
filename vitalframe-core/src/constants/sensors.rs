//! Sensor Scaling and Signal Assessment Thresholds
//!
//! Analog channels are read through a 16-bit scaled ADC (`read_u16`
//! semantics: 0..=65535 over 0..=3.3 V).

/// ADC reference voltage (V).
pub const ADC_VREF: f32 = 3.3;

/// Full-scale ADC count.
pub const ADC_FULL_SCALE: f32 = 65535.0;

// ===== EMG (MyoWare) ASSESSMENT =====

/// ADC count at or above which the EMG front end is saturated high.
pub const EMG_SAT_HIGH_ADC: u16 = 64_000;

/// ADC count at or below which the EMG input is shorted to ground.
pub const EMG_SAT_LOW_ADC: u16 = 200;

/// Voltage at or above which the EMG front end is saturated high (V).
pub const EMG_SAT_HIGH_V: f32 = 3.2;

/// Minimum peak-to-peak swing of a live EMG signal (counts).
///
/// Less than this across the buffer means the electrode is detached or
/// the muscle is perfectly still, reported as a flatline.
pub const EMG_MIN_PEAK_TO_PEAK: u16 = 300;

/// Number of recent EMG samples inspected for flatline detection.
pub const EMG_BUFFER_LEN: usize = 25;

/// Samples needed before the flatline check is applied.
pub const EMG_MIN_SAMPLES_FOR_FLATLINE: usize = 8;
