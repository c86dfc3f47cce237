//! Diagnostic counters
//!
//! Everything the tick loop absorbs (failed reads, empty FIFOs, rejected
//! beats, finger removal) is counted here instead of propagated. Counters
//! saturate rather than wrap.

use crate::{channels::ChannelKind, errors::ReadError};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Read counters of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ChannelCounters {
    /// Successful reads stored as the channel value
    pub reads_ok: u32,
    /// Reads that returned an error
    pub read_errors: u32,
    /// Reads that found no sample ready
    pub unavailable: u32,
    /// Most recent read error
    #[cfg_attr(feature = "serde", serde(skip))]
    pub last_error: Option<ReadError>,
}

impl ChannelCounters {
    pub(crate) fn record_ok(&mut self) {
        self.reads_ok = self.reads_ok.saturating_add(1);
    }

    pub(crate) fn record_error(&mut self, error: ReadError) {
        self.read_errors = self.read_errors.saturating_add(1);
        self.last_error = Some(error);
    }

    pub(crate) fn record_unavailable(&mut self) {
        self.unavailable = self.unavailable.saturating_add(1);
    }

    /// Reads attempted, successful or not
    pub fn attempts(&self) -> u32 {
        self.reads_ok
            .saturating_add(self.read_errors)
            .saturating_add(self.unavailable)
    }
}

/// Heart-rate estimator counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EstimatorStats {
    /// PPG samples fed to the estimator
    pub samples: u64,
    /// Local maxima accepted as beats
    pub peaks_accepted: u32,
    /// Local maxima under the threshold
    pub peaks_below_threshold: u32,
    /// Local maxima with too little prominence
    pub peaks_low_amplitude: u32,
    /// Local maxima inside the refractory interval
    pub peaks_refractory: u32,
    /// Local maxima cut off by a drop in the DC level
    pub peaks_baseline_shift: u32,
    /// Intervals discarded for an implausible BPM
    pub intervals_rejected: u32,
    /// Transitions from finger present to absent
    pub finger_losses: u32,
    /// Recomputes that published a new BPM
    pub publishes: u32,
    /// Recomputes that kept the previous value
    pub holds: u32,
    /// Recomputes that reported no reading because no finger was present
    pub no_finger: u32,
}

/// Scheduler-wide diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Diagnostics {
    /// Ticks processed
    pub ticks: u64,
    /// PPG samples drained from the pulse driver
    pub ppg_samples_drained: u64,
    /// Ticks that stopped draining at the per-tick bound
    pub drain_limit_hits: u32,
    channels: [ChannelCounters; ChannelKind::ALL.len()],
    /// Heart-rate estimator counters
    pub estimator: EstimatorStats,
}

impl Diagnostics {
    /// All counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters of one channel
    pub fn channel(&self, kind: ChannelKind) -> &ChannelCounters {
        &self.channels[kind as usize]
    }

    pub(crate) fn channel_mut(&mut self, kind: ChannelKind) -> &mut ChannelCounters {
        &mut self.channels[kind as usize]
    }

    /// Failed reads across all channels
    pub fn total_read_errors(&self) -> u32 {
        self.channels
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.read_errors))
    }
}
