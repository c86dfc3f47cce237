//! Streaming peak detection over the smoothed PPG signal
//!
//! A sample is reported one step late, once its successor is known:
//!
//! ```text
//!           p
//!          / \
//!     b __/   \__ v        b < p  and  p >= v   →  p is a local maximum
//! ```
//!
//! A local maximum becomes a beat when it clears the threshold, stands at
//! least `min_amplitude` above the window minimum, and is at least the
//! refractory interval after the previously accepted peak. Threshold and
//! floor are taken from the window up to and including `p`, never `v`.
//! A successor below that floor is a step in the DC level, not a crest.

use crate::{
    buffer::CircularBuffer,
    config::{HeartRateConfig, PeakThreshold},
    constants::buffers::MAX_THRESHOLD_WINDOW,
};

/// An accepted peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Sample index of the peak
    pub index: u64,
    /// Smoothed value at the peak
    pub value: f32,
    /// Samples since the previous accepted peak, `None` for the first
    pub interval: Option<u32>,
}

/// Why a local maximum was not counted as a beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Below the threshold
    BelowThreshold,
    /// Prominence too small to be a pulse
    LowAmplitude,
    /// Too close to the previous accepted peak
    Refractory,
    /// Followed by a drop below the window minimum
    BaselineShift,
}

/// Result of feeding one sample that completed a local maximum
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PeakOutcome {
    /// Counted as a beat
    Accepted(Peak),
    /// Local maximum that is not a beat
    Rejected(Rejection),
}

/// Streaming peak detector
#[derive(Debug, Clone)]
pub struct PeakDetector {
    threshold: PeakThreshold,
    min_amplitude: f32,
    refractory: u64,
    window: CircularBuffer<f32, MAX_THRESHOLD_WINDOW>,
    /// s[n-2]
    before: Option<f32>,
    /// s[n-1]
    prev: Option<f32>,
    last_peak: Option<u64>,
}

impl PeakDetector {
    /// Detector with empty history
    pub fn new(config: &HeartRateConfig) -> Self {
        Self {
            threshold: config.threshold,
            min_amplitude: config.min_peak_amplitude,
            refractory: config.refractory_samples() as u64,
            window: CircularBuffer::with_window(config.threshold_window_samples()),
            before: None,
            prev: None,
            last_peak: None,
        }
    }

    /// Current threshold level, `None` until the window holds a sample
    pub fn threshold_level(&self) -> Option<f32> {
        match self.threshold {
            PeakThreshold::Fixed { level } => Some(level),
            PeakThreshold::Adaptive { ratio } => {
                let (lo, hi) = self.window.min_max()?;
                Some(lo + (hi - lo) * ratio)
            }
        }
    }

    /// Index of the last accepted peak
    pub fn last_peak(&self) -> Option<u64> {
        self.last_peak
    }

    /// Feed the smoothed sample with index `index`
    ///
    /// Indices are expected to increase by one per call. While `armed` is
    /// false (warm-up) the window and neighbours are updated but no peak is
    /// evaluated.
    pub fn push(&mut self, value: f32, index: u64, armed: bool) -> Option<PeakOutcome> {
        let outcome = match (armed, self.before, self.prev) {
            (true, Some(before), Some(prev)) if before < prev && prev >= value => {
                Some(self.evaluate(prev, index.saturating_sub(1), value))
            }
            _ => None,
        };

        self.window.push(value);
        self.before = self.prev;
        self.prev = Some(value);
        outcome
    }

    fn evaluate(&mut self, value: f32, index: u64, next: f32) -> PeakOutcome {
        let level = self.threshold_level().unwrap_or(value);
        if value <= level {
            return PeakOutcome::Rejected(Rejection::BelowThreshold);
        }

        let floor = self.window.min_max().map_or(value, |(lo, _)| lo);
        if value - floor < self.min_amplitude {
            return PeakOutcome::Rejected(Rejection::LowAmplitude);
        }
        if next < floor {
            return PeakOutcome::Rejected(Rejection::BaselineShift);
        }

        let interval = match self.last_peak {
            Some(last) if index.saturating_sub(last) < self.refractory => {
                return PeakOutcome::Rejected(Rejection::Refractory);
            }
            Some(last) => Some(index.saturating_sub(last).min(u64::from(u32::MAX)) as u32),
            None => None,
        };

        self.last_peak = Some(index);
        PeakOutcome::Accepted(Peak { index, value, interval })
    }

    /// Forget all signal history
    pub fn reset(&mut self) {
        self.window.clear();
        self.before = None;
        self.prev = None;
        self.last_peak = None;
    }
}
