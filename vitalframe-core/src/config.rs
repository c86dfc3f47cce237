//! Static Configuration for the Scheduler and Heart-Rate Estimator
//!
//! ## Overview
//!
//! Configuration is loaded once at start-up and never changes afterwards.
//! Everything is plain data with `Default` impls reproducing the reference
//! deployment, plus a few presets. With the `serde` feature the structs can
//! be deserialized from whatever the host stores them in.
//!
//! ## Fail Fast
//!
//! [`MonitorConfig::validate`] is the only place a configuration problem can
//! surface, and it runs inside
//! [`Scheduler::new`](crate::scheduler::Scheduler::new)
//! before the first tick. The tick loop itself never fails on configuration.
//!
//! ## Reference Deployment
//!
//! ```text
//! master tick        100 ms (10 Hz frames)
//!
//! channel            period     freshness
//! ecg                100 ms     -
//! gsr                100 ms     -
//! muscle             100 ms     -
//! environment        2000 ms    -
//! body_temperature   1000 ms    tracked
//! pulse              2000 ms    tracked   (PPG drained every tick)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use vitalframe_core::config::{ChannelConfig, MonitorConfig};
//! use vitalframe_core::channels::ChannelKind;
//!
//! let config = MonitorConfig::new(100)
//!     .with_channel(ChannelConfig::new(ChannelKind::Gsr, 100))?
//!     .with_channel(ChannelConfig::new(ChannelKind::Environment, 2000))?;
//!
//! config.validate()?;
//! # Ok::<(), vitalframe_core::ConfigError>(())
//! ```

use heapless::Vec;

use crate::{
    channels::ChannelKind,
    constants::{
        buffers::{MAX_CHANNELS, MAX_INTERVAL_HISTORY, MAX_SMOOTHING_WINDOW, MAX_THRESHOLD_WINDOW},
        cardiac::{
            FINGER_PRESENT_IR, HR_INTERVAL_HISTORY, HR_MAX_BPM, HR_MIN_BPM, HR_MIN_PEAK_AMPLITUDE,
            HR_RECOMPUTE_PERIOD_MS, HR_REFRACTORY_MS, HR_SMOOTHING_WINDOW, HR_THRESHOLD_RATIO,
            HR_THRESHOLD_WINDOW_MS, HR_WARMUP_MS, PPG_SAMPLE_RATE_HZ,
        },
        timing::{
            BODY_TEMPERATURE_PERIOD_MS, ECG_PERIOD_MS, ENVIRONMENT_PERIOD_MS, GSR_PERIOD_MS,
            MASTER_TICK_MS, MAX_DRAIN_PER_TICK, MS_PER_SECOND, MUSCLE_PERIOD_MS,
            SECONDS_PER_MINUTE,
        },
    },
    errors::{ConfigError, ConfigResult},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a channel reports before its first successful reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NoData {
    /// Explicit absence, distinguishable from a real zero
    #[default]
    Absent,
    /// All-zero value of the channel's kind
    Zero,
}

/// Per-channel configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelConfig {
    /// Sensor this entry schedules
    pub kind: ChannelKind,
    /// Time between desired samples; for the pulse channel, the BPM publish period
    pub update_period_ms: u32,
    /// Whether frame entries for this channel carry a fresh/held flag
    pub tracks_freshness: bool,
    /// Sentinel reported before the first reading
    pub no_data: NoData,
}

impl ChannelConfig {
    /// Channel with freshness tracking and the absent sentinel
    pub fn new(kind: ChannelKind, update_period_ms: u32) -> Self {
        Self {
            kind,
            update_period_ms,
            tracks_freshness: true,
            no_data: NoData::Absent,
        }
    }

    /// Enable or disable the freshness flag
    pub fn with_freshness(mut self, tracks_freshness: bool) -> Self {
        self.tracks_freshness = tracks_freshness;
        self
    }

    /// Set the no-data sentinel
    pub fn with_no_data(mut self, no_data: NoData) -> Self {
        self.no_data = no_data;
        self
    }
}

/// How the peak detector decides a sample is high enough to be a beat
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PeakThreshold {
    /// `min + (max - min) * ratio` over the recent smoothed window
    Adaptive {
        /// Fraction of the window range, in `[0, 1)`
        ratio: f32,
    },
    /// Fixed level in smoothed raw counts
    Fixed {
        /// Level a peak must exceed
        level: f32,
    },
}

/// How the interval history is collapsed into one BPM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IntervalAveraging {
    /// Arithmetic mean of the interval history
    #[default]
    Mean,
    /// Median of the interval history
    Median,
}

/// Heart-rate estimator configuration
///
/// Windows are in milliseconds and converted to sample counts with
/// `sample_rate_hz` (see [`HeartRateConfig::ms_to_samples`]).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeartRateConfig {
    /// PPG samples per second delivered by the driver
    pub sample_rate_hz: u32,
    /// Moving-average window over raw IR (samples)
    pub smoothing_window: usize,
    /// Window for the adaptive threshold (ms)
    pub threshold_window_ms: u32,
    /// Peak threshold rule
    pub threshold: PeakThreshold,
    /// No estimate before this much signal (ms)
    pub warmup_ms: u32,
    /// BPM publish period (ms)
    pub recompute_period_ms: u32,
    /// Minimum spacing between accepted peaks (ms)
    pub refractory_ms: u32,
    /// Lowest plausible rate
    pub min_bpm: u16,
    /// Highest plausible rate
    pub max_bpm: u16,
    /// Number of inter-beat intervals kept
    pub interval_history: usize,
    /// How intervals become one BPM
    pub averaging: IntervalAveraging,
    /// Minimum prominence of a peak above the window minimum (counts)
    pub min_peak_amplitude: f32,
    /// Raw IR below this means no finger on the sensor
    pub finger_present_ir: u32,
}

impl Default for HeartRateConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: PPG_SAMPLE_RATE_HZ,
            smoothing_window: HR_SMOOTHING_WINDOW,
            threshold_window_ms: HR_THRESHOLD_WINDOW_MS,
            threshold: PeakThreshold::Adaptive { ratio: HR_THRESHOLD_RATIO },
            warmup_ms: HR_WARMUP_MS,
            recompute_period_ms: HR_RECOMPUTE_PERIOD_MS,
            refractory_ms: HR_REFRACTORY_MS,
            min_bpm: HR_MIN_BPM,
            max_bpm: HR_MAX_BPM,
            interval_history: HR_INTERVAL_HISTORY,
            averaging: IntervalAveraging::Mean,
            min_peak_amplitude: HR_MIN_PEAK_AMPLITUDE,
            finger_present_ir: FINGER_PRESENT_IR,
        }
    }
}

impl HeartRateConfig {
    /// Estimator for a subject at rest (tighter rate bounds, longer refractory)
    pub fn resting() -> Self {
        Self {
            max_bpm: 150,
            refractory_ms: 400,
            ..Self::default()
        }
    }

    /// Estimator for a subject in motion (high rates, median rejects motion spikes)
    pub fn exercise() -> Self {
        Self {
            min_bpm: 40,
            refractory_ms: 250,
            smoothing_window: 4,
            averaging: IntervalAveraging::Median,
            ..Self::default()
        }
    }

    /// Convert a duration to a sample count at the configured rate (rounded down)
    pub fn ms_to_samples(&self, ms: u32) -> usize {
        (u64::from(ms) * u64::from(self.sample_rate_hz) / u64::from(MS_PER_SECOND)) as usize
    }

    /// Convert a duration to the smallest sample count that spans it
    pub fn ms_to_samples_ceil(&self, ms: u32) -> usize {
        (u64::from(ms) * u64::from(self.sample_rate_hz)).div_ceil(u64::from(MS_PER_SECOND)) as usize
    }

    /// Warm-up length in samples
    pub fn warmup_samples(&self) -> usize {
        self.ms_to_samples(self.warmup_ms)
    }

    /// Refractory interval in samples, rounded up
    pub fn refractory_samples(&self) -> usize {
        self.ms_to_samples_ceil(self.refractory_ms)
    }

    /// Adaptive threshold window in samples
    pub fn threshold_window_samples(&self) -> usize {
        self.ms_to_samples(self.threshold_window_ms).max(1)
    }

    /// BPM corresponding to an interval of `samples` PPG samples
    pub fn bpm_for_interval(&self, samples: f32) -> f32 {
        (SECONDS_PER_MINUTE * self.sample_rate_hz) as f32 / samples
    }

    /// Whether a BPM value lies in the plausible range
    pub fn is_plausible(&self, bpm: f32) -> bool {
        bpm >= f32::from(self.min_bpm) && bpm <= f32::from(self.max_bpm)
    }

    /// Reject settings the estimator cannot honour
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.smoothing_window == 0 || self.smoothing_window > MAX_SMOOTHING_WINDOW {
            return Err(ConfigError::InvalidSmoothingWindow {
                size: self.smoothing_window,
                max: MAX_SMOOTHING_WINDOW,
            });
        }
        if self.interval_history == 0 || self.interval_history > MAX_INTERVAL_HISTORY {
            return Err(ConfigError::InvalidIntervalHistory {
                size: self.interval_history,
                max: MAX_INTERVAL_HISTORY,
            });
        }
        let window = self.threshold_window_samples();
        if window > MAX_THRESHOLD_WINDOW {
            return Err(ConfigError::WindowTooLong {
                samples: window,
                max: MAX_THRESHOLD_WINDOW,
            });
        }
        if self.min_bpm == 0 || self.min_bpm >= self.max_bpm {
            return Err(ConfigError::InvalidBpmRange {
                min: self.min_bpm,
                max: self.max_bpm,
            });
        }
        if let PeakThreshold::Adaptive { ratio } = self.threshold {
            if !(0.0..1.0).contains(&ratio) {
                return Err(ConfigError::InvalidThresholdRatio);
            }
        }
        if self.recompute_period_ms == 0 {
            return Err(ConfigError::ZeroUpdatePeriod { channel: ChannelKind::Pulse });
        }

        // Slowest plausible beat must still clear the refractory interval
        let max_interval_ms = SECONDS_PER_MINUTE * MS_PER_SECOND / u32::from(self.min_bpm);
        if self.refractory_ms >= max_interval_ms {
            return Err(ConfigError::RefractoryTooLong {
                refractory_ms: self.refractory_ms,
                max_interval_ms,
            });
        }

        Ok(())
    }
}

/// Complete start-up configuration
///
/// Channel order is the processing order inside every tick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorConfig {
    /// Master tick period (ms)
    pub master_period_ms: u32,
    /// Upper bound on PPG samples drained per tick
    pub max_drain_per_tick: usize,
    /// Channels in frame order
    pub channels: Vec<ChannelConfig, MAX_CHANNELS>,
    /// PPG estimator settings
    pub heart_rate: HeartRateConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let heart_rate = HeartRateConfig::default();
        let mut channels = Vec::new();
        for channel in [
            ChannelConfig::new(ChannelKind::Ecg, ECG_PERIOD_MS).with_freshness(false),
            ChannelConfig::new(ChannelKind::Gsr, GSR_PERIOD_MS).with_freshness(false),
            ChannelConfig::new(ChannelKind::Muscle, MUSCLE_PERIOD_MS).with_freshness(false),
            ChannelConfig::new(ChannelKind::Environment, ENVIRONMENT_PERIOD_MS).with_freshness(false),
            ChannelConfig::new(ChannelKind::BodyTemperature, BODY_TEMPERATURE_PERIOD_MS),
            ChannelConfig::new(ChannelKind::Pulse, heart_rate.recompute_period_ms),
        ] {
            // Six entries always fit MAX_CHANNELS
            let _ = channels.push(channel);
        }

        Self {
            master_period_ms: MASTER_TICK_MS,
            max_drain_per_tick: MAX_DRAIN_PER_TICK,
            channels,
            heart_rate,
        }
    }
}

impl MonitorConfig {
    /// Empty channel table with default estimator settings
    pub fn new(master_period_ms: u32) -> Self {
        Self {
            master_period_ms,
            max_drain_per_tick: MAX_DRAIN_PER_TICK,
            channels: Vec::new(),
            heart_rate: HeartRateConfig::default(),
        }
    }

    /// Only the pulse channel, for heart-rate bring-up
    pub fn pulse_only() -> Self {
        let mut config = Self::new(MASTER_TICK_MS);
        let pulse = ChannelConfig::new(ChannelKind::Pulse, config.heart_rate.recompute_period_ms);
        // An empty table always has room
        let _ = config.channels.push(pulse);
        config
    }

    /// Append a channel, failing if the table is full
    pub fn with_channel(mut self, channel: ChannelConfig) -> ConfigResult<Self> {
        self.channels.push(channel).map_err(|_| ConfigError::TooManyChannels {
            count: MAX_CHANNELS + 1,
            max: MAX_CHANNELS,
        })?;
        Ok(self)
    }

    /// Replace the estimator settings
    pub fn with_heart_rate(mut self, heart_rate: HeartRateConfig) -> Self {
        self.heart_rate = heart_rate;
        self
    }

    /// Configuration of one channel, if present
    pub fn channel(&self, kind: ChannelKind) -> Option<&ChannelConfig> {
        self.channels.iter().find(|c| c.kind == kind)
    }

    /// Check the whole configuration; call before starting the tick loop
    pub fn validate(&self) -> ConfigResult<()> {
        if self.master_period_ms == 0 {
            return Err(ConfigError::ZeroMasterPeriod);
        }
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if self.max_drain_per_tick == 0 {
            return Err(ConfigError::ZeroDrainLimit);
        }

        for (i, channel) in self.channels.iter().enumerate() {
            if channel.update_period_ms == 0 {
                return Err(ConfigError::ZeroUpdatePeriod { channel: channel.kind });
            }
            if self.channels[..i].iter().any(|c| c.kind == channel.kind) {
                return Err(ConfigError::DuplicateChannel { channel: channel.kind });
            }
        }

        if let Some(pulse) = self.channel(ChannelKind::Pulse) {
            self.heart_rate.validate()?;
            if pulse.update_period_ms != self.heart_rate.recompute_period_ms {
                return Err(ConfigError::PulsePeriodMismatch {
                    channel_ms: pulse.update_period_ms,
                    recompute_ms: self.heart_rate.recompute_period_ms,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channels.len(), 6);
        assert_eq!(config.channels[0].kind, ChannelKind::Ecg);
        assert_eq!(config.channels[5].kind, ChannelKind::Pulse);
        assert!(config.channel(ChannelKind::BodyTemperature).unwrap().tracks_freshness);
    }

    #[test]
    fn zero_periods_fail_fast() {
        let mut config = MonitorConfig::default();
        config.master_period_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroMasterPeriod));

        let config = MonitorConfig::new(100)
            .with_channel(ChannelConfig::new(ChannelKind::Gsr, 0))
            .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroUpdatePeriod { channel: ChannelKind::Gsr })
        );
    }

    #[test]
    fn empty_and_duplicate_tables_rejected() {
        assert_eq!(MonitorConfig::new(100).validate(), Err(ConfigError::NoChannels));

        let mut config = MonitorConfig::default();
        config.max_drain_per_tick = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDrainLimit));

        let config = MonitorConfig::new(100)
            .with_channel(ChannelConfig::new(ChannelKind::Gsr, 100))
            .unwrap()
            .with_channel(ChannelConfig::new(ChannelKind::Gsr, 200))
            .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateChannel { channel: ChannelKind::Gsr })
        );
    }

    #[test]
    fn channel_table_capacity_enforced() {
        let mut config = MonitorConfig::new(100);
        for _ in 0..MAX_CHANNELS {
            config = config.with_channel(ChannelConfig::new(ChannelKind::Gsr, 100)).unwrap();
        }
        assert!(matches!(
            config.with_channel(ChannelConfig::new(ChannelKind::Gsr, 100)),
            Err(ConfigError::TooManyChannels { .. })
        ));
    }

    #[test]
    fn pulse_period_must_match_recompute() {
        let mut config = MonitorConfig::default();
        config.heart_rate.recompute_period_ms = 1000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PulsePeriodMismatch { channel_ms: 2000, recompute_ms: 1000 })
        );
    }

    #[test]
    fn heart_rate_bounds_checked() {
        let mut hr = HeartRateConfig::default();
        hr.min_bpm = 200;
        hr.max_bpm = 100;
        assert!(matches!(hr.validate(), Err(ConfigError::InvalidBpmRange { .. })));

        let mut hr = HeartRateConfig::default();
        hr.smoothing_window = 0;
        assert!(matches!(hr.validate(), Err(ConfigError::InvalidSmoothingWindow { .. })));

        let mut hr = HeartRateConfig::default();
        hr.threshold = PeakThreshold::Adaptive { ratio: 1.5 };
        assert_eq!(hr.validate(), Err(ConfigError::InvalidThresholdRatio));

        let mut hr = HeartRateConfig::default();
        hr.threshold_window_ms = 60_000;
        assert!(matches!(hr.validate(), Err(ConfigError::WindowTooLong { .. })));

        let mut hr = HeartRateConfig::default();
        hr.refractory_ms = 2500;
        assert!(matches!(hr.validate(), Err(ConfigError::RefractoryTooLong { .. })));
    }

    #[test]
    fn presets_are_valid() {
        assert!(HeartRateConfig::resting().validate().is_ok());
        assert!(HeartRateConfig::exercise().validate().is_ok());
        assert_eq!(HeartRateConfig::exercise().averaging, IntervalAveraging::Median);

        let config = MonitorConfig::pulse_only();
        assert!(config.validate().is_ok());
        assert_eq!(config.channels.len(), 1);

        let config = MonitorConfig::default().with_heart_rate(HeartRateConfig::resting());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sample_conversions() {
        let hr = HeartRateConfig::default();
        assert_eq!(hr.sample_rate_hz, 50);
        assert_eq!(hr.warmup_samples(), 250);
        assert_eq!(hr.refractory_samples(), 15);
        assert_eq!(hr.threshold_window_samples(), 150);
        assert_eq!(hr.bpm_for_interval(40.0), 75.0);
        assert!(hr.is_plausible(75.0));
        assert!(!hr.is_plausible(250.0));
    }

    #[test]
    fn refractory_rounds_up_to_cover_interval() {
        let mut hr = HeartRateConfig::default();
        hr.refractory_ms = 310;
        // 15.5 samples at 50 Hz; 15 would allow a 300 ms gap
        assert_eq!(hr.ms_to_samples(310), 15);
        assert_eq!(hr.refractory_samples(), 16);
        assert!(hr.refractory_samples() as u32 * 1000 / hr.sample_rate_hz >= hr.refractory_ms);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_round_trips_through_json() {
        let config = MonitorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"body_temperature\""));
        let back: MonitorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
