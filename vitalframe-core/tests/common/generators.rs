//! Synthetic PPG signal generation
//!
//! Models a MAX30102 class sensor: samples are produced at a fixed rate
//! (400 Hz averaged by 8, so 50 Hz) into an internal FIFO, and the host
//! drains whatever has accumulated since its last visit. The waveform is a
//! sine pulse on a DC baseline with optional deterministic noise, a window
//! where the finger is lifted off the sensor, and a step in the DC level
//! such as the finger pressing harder or easing off.

use vitalframe_core::{
    channels::RawSample,
    errors::ReadResult,
    time::Timestamp,
    traits::ChannelDriver,
};

/// PPG samples per second
pub const PPG_RATE_HZ: u64 = 50;

/// Milliseconds between PPG samples
pub const PPG_SAMPLE_MS: u64 = 1000 / PPG_RATE_HZ;

/// IR level with a finger on the sensor
pub const IR_BASELINE: f32 = 100_000.0;

/// IR level with nothing on the sensor
pub const IR_NO_FINGER: u32 = 5_000;

/// Simulated PPG sensor FIFO
#[derive(Debug, Clone)]
pub struct PpgSimulator {
    /// Samples per beat
    beat_samples: u64,
    amplitude: f32,
    noise: f32,
    /// Sample times `[start, end)` with no finger on the sensor
    finger_off: Option<(Timestamp, Timestamp)>,
    /// From this sample time on, the DC level
    baseline_step: Option<(Timestamp, f32)>,
    /// Index of the next sample to hand out
    next: u64,
    seed: u32,
}

impl PpgSimulator {
    /// Clean pulse at `bpm`, which must divide 3000 evenly for an exact rhythm
    pub fn new(bpm: u32) -> Self {
        Self {
            beat_samples: 60 * PPG_RATE_HZ / u64::from(bpm),
            amplitude: 1000.0,
            noise: 0.0,
            finger_off: None,
            baseline_step: None,
            next: 0,
            seed: 42,
        }
    }

    /// Add uniform noise of ± `counts`
    pub fn with_noise(mut self, counts: f32) -> Self {
        self.noise = counts;
        self
    }

    /// Lift the finger between `start` and `end` (ms)
    pub fn with_finger_off(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.finger_off = Some((start, end));
        self
    }

    /// Move the DC level to `level` from `at` (ms) onwards
    pub fn with_baseline_step(mut self, at: Timestamp, level: f32) -> Self {
        self.baseline_step = Some((at, level));
        self
    }

    /// Timestamp of sample `n`
    pub fn sample_time(n: u64) -> Timestamp {
        n * PPG_SAMPLE_MS
    }

    /// IR value of sample `n`, ignoring noise
    pub fn clean_ir(&self, n: u64) -> u32 {
        let t = Self::sample_time(n);
        if let Some((start, end)) = self.finger_off {
            if t >= start && t < end {
                return IR_NO_FINGER;
            }
        }
        let baseline = match self.baseline_step {
            Some((at, level)) if t >= at => level,
            _ => IR_BASELINE,
        };
        let phase = (n % self.beat_samples) as f32 / self.beat_samples as f32;
        (baseline + self.amplitude * (2.0 * std::f32::consts::PI * phase).sin()) as u32
    }

    fn random_noise(&mut self) -> f32 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        let uniform = (self.seed as f32) / (u32::MAX as f32);
        (uniform - 0.5) * 2.0 * self.noise
    }
}

impl ChannelDriver for PpgSimulator {
    fn read(&mut self, now: Timestamp) -> ReadResult<RawSample> {
        if Self::sample_time(self.next) > now {
            return Err(nb::Error::WouldBlock);
        }

        let n = self.next;
        self.next += 1;

        let clean = self.clean_ir(n);
        let ir = if clean == IR_NO_FINGER || self.noise == 0.0 {
            clean
        } else {
            (clean as f32 + self.random_noise()) as u32
        };
        Ok(RawSample::Ppg { red: ir / 2, ir })
    }
}
