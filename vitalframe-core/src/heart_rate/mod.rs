//! Streaming Heart-Rate Estimation from PPG
//!
//! ## Pipeline
//!
//! ```text
//! raw IR ──► finger check ──► SmoothingBuffer ──► PeakDetector ──► interval history
//!               │                                   (armed after        │
//!               ▼                                    warm-up)           ▼
//!          reset to "no reading"                              recompute() every
//!                                                             recompute period
//! ```
//!
//! ## States
//!
//! - **Collecting**: smoothed samples accumulate for the warm-up duration;
//!   no peak is evaluated and nothing is published.
//! - **Tracking**: local maxima are evaluated as beats; intervals between
//!   accepted beats that map to a plausible BPM enter the rolling history.
//!
//! Raw IR below the finger-present level drops the estimator back to an
//! empty Collecting state and clears the published value, so the next
//! recompute reports "no reading" instead of a stale rate.
//!
//! ## Publishing
//!
//! [`HeartRateEstimator::recompute`] is called on its own coarse cadence.
//! When new intervals arrived since the previous call it publishes the
//! mean (or median) of the history as BPM; otherwise the previous estimate
//! is held unchanged. Noisy input never fails: it only degrades to "hold"
//! or "no reading".

mod peaks;
mod smoothing;

pub use peaks::{Peak, PeakDetector, PeakOutcome, Rejection};
pub use smoothing::SmoothingBuffer;

use heapless::Vec;

use crate::{
    buffer::CircularBuffer,
    config::{HeartRateConfig, IntervalAveraging},
    constants::buffers::MAX_INTERVAL_HISTORY,
    diagnostics::EstimatorStats,
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Estimator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EstimatorPhase {
    /// Warm-up, no estimate yet
    Collecting,
    /// Detecting beats
    Tracking,
}

/// Streaming PPG heart-rate estimator
#[derive(Debug, Clone)]
pub struct HeartRateEstimator {
    config: HeartRateConfig,
    smoothing: SmoothingBuffer,
    detector: PeakDetector,
    intervals: CircularBuffer<u32, MAX_INTERVAL_HISTORY>,
    /// Intervals pushed since the last recompute
    pending: usize,
    phase: EstimatorPhase,
    /// Samples seen since the last reset
    collected: usize,
    warmup_samples: usize,
    /// Index of the next sample
    index: u64,
    finger_present: bool,
    latest_ir: Option<u32>,
    published: Option<u16>,
    stats: EstimatorStats,
}

impl HeartRateEstimator {
    /// Create an estimator; `config` is expected to be validated already
    pub fn new(config: HeartRateConfig) -> Self {
        Self {
            smoothing: SmoothingBuffer::new(config.smoothing_window),
            detector: PeakDetector::new(&config),
            intervals: CircularBuffer::with_window(config.interval_history),
            pending: 0,
            phase: EstimatorPhase::Collecting,
            collected: 0,
            warmup_samples: config.warmup_samples(),
            index: 0,
            finger_present: false,
            latest_ir: None,
            published: None,
            stats: EstimatorStats::default(),
            config,
        }
    }

    /// Feed one raw IR sample
    ///
    /// Returns the outcome when this sample completed a local maximum.
    pub fn push(&mut self, ir: u32) -> Option<PeakOutcome> {
        self.latest_ir = Some(ir);
        self.stats.samples = self.stats.samples.saturating_add(1);

        if ir < self.config.finger_present_ir {
            if self.finger_present {
                self.stats.finger_losses = self.stats.finger_losses.saturating_add(1);
                log_info!("Finger removed (ir={}), heart rate invalidated", ir);
            }
            self.finger_present = false;
            self.reset();
            return None;
        }

        if !self.finger_present {
            log_info!("Finger detected (ir={}), collecting samples", ir);
            self.finger_present = true;
        }

        let smoothed = self.smoothing.push(ir as f32);
        let index = self.index;
        self.index += 1;

        if self.phase == EstimatorPhase::Collecting {
            self.collected += 1;
            if self.collected >= self.warmup_samples {
                self.phase = EstimatorPhase::Tracking;
                log_debug!("Warm-up complete after {} samples", self.collected);
            }
        }

        let armed = self.phase == EstimatorPhase::Tracking;
        let outcome = self.detector.push(smoothed, index, armed)?;
        self.record(outcome);
        Some(outcome)
    }

    fn record(&mut self, outcome: PeakOutcome) {
        let stats = &mut self.stats;
        match outcome {
            PeakOutcome::Accepted(peak) => {
                stats.peaks_accepted = stats.peaks_accepted.saturating_add(1);
                if let Some(interval) = peak.interval {
                    let bpm = self.config.bpm_for_interval(interval as f32);
                    if self.config.is_plausible(bpm) {
                        self.intervals.push(interval);
                        self.pending += 1;
                    } else {
                        stats.intervals_rejected = stats.intervals_rejected.saturating_add(1);
                        log_debug!("Interval of {} samples ({} bpm) rejected", interval, bpm);
                    }
                }
            }
            PeakOutcome::Rejected(Rejection::BelowThreshold) => {
                stats.peaks_below_threshold = stats.peaks_below_threshold.saturating_add(1);
            }
            PeakOutcome::Rejected(Rejection::LowAmplitude) => {
                stats.peaks_low_amplitude = stats.peaks_low_amplitude.saturating_add(1);
            }
            PeakOutcome::Rejected(Rejection::Refractory) => {
                stats.peaks_refractory = stats.peaks_refractory.saturating_add(1);
            }
            PeakOutcome::Rejected(Rejection::BaselineShift) => {
                stats.peaks_baseline_shift = stats.peaks_baseline_shift.saturating_add(1);
                log_debug!("Peak at sample {} dropped, DC level shifted", self.index);
            }
        }
    }

    /// Refresh the published estimate; call once per recompute period
    pub fn recompute(&mut self) -> Option<u16> {
        if !self.finger_present {
            self.published = None;
            self.stats.no_finger = self.stats.no_finger.saturating_add(1);
            return None;
        }

        if self.pending == 0 {
            self.stats.holds = self.stats.holds.saturating_add(1);
            log_debug!("No new beats, holding {:?} bpm", self.published);
            return self.published;
        }

        self.pending = 0;
        if let Some(interval) = self.average_interval() {
            let bpm = libm::roundf(self.config.bpm_for_interval(interval));
            self.published = Some(bpm as u16);
            self.stats.publishes = self.stats.publishes.saturating_add(1);
            log_debug!("Published {} bpm from {} intervals", bpm, self.intervals.len());
        }
        self.published
    }

    fn average_interval(&self) -> Option<f32> {
        if self.intervals.is_empty() {
            return None;
        }
        match self.config.averaging {
            IntervalAveraging::Mean => {
                let sum: u64 = self.intervals.iter().map(|&i| u64::from(i)).sum();
                Some(sum as f32 / self.intervals.len() as f32)
            }
            IntervalAveraging::Median => {
                let mut sorted: Vec<u32, MAX_INTERVAL_HISTORY> =
                    self.intervals.iter().copied().collect();
                sorted.sort_unstable();
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    Some((sorted[mid - 1] + sorted[mid]) as f32 / 2.0)
                } else {
                    Some(sorted[mid] as f32)
                }
            }
        }
    }

    /// Drop all signal history and the published value
    pub fn reset(&mut self) {
        self.smoothing.clear();
        self.detector.reset();
        self.intervals.clear();
        self.pending = 0;
        self.phase = EstimatorPhase::Collecting;
        self.collected = 0;
        self.published = None;
    }

    /// Last published BPM
    pub fn current(&self) -> Option<u16> {
        self.published
    }

    /// Warm-up phase
    pub fn phase(&self) -> EstimatorPhase {
        self.phase
    }

    /// Fraction of the warm-up completed, 1.0 once tracking
    pub fn warmup_progress(&self) -> f32 {
        match self.phase {
            EstimatorPhase::Tracking => 1.0,
            EstimatorPhase::Collecting if self.warmup_samples == 0 => 1.0,
            EstimatorPhase::Collecting => self.collected as f32 / self.warmup_samples as f32,
        }
    }

    /// Whether the last sample was above the finger threshold
    pub fn finger_present(&self) -> bool {
        self.finger_present
    }

    /// Most recent raw IR intensity
    pub fn latest_ir(&self) -> Option<u32> {
        self.latest_ir
    }

    /// Intervals currently held, oldest first
    pub fn intervals(&self) -> impl Iterator<Item = u32> + '_ {
        self.intervals.iter().copied()
    }

    /// Estimator counters
    pub fn stats(&self) -> &EstimatorStats {
        &self.stats
    }

    /// Settings in use
    pub fn config(&self) -> &HeartRateConfig {
        &self.config
    }
}
