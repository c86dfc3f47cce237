//! EMG signal assessment
//!
//! Decides whether a MyoWare reading is a live muscle signal:
//! - Saturation high: ADC or voltage at the rail
//! - Saturation low: input shorted to ground
//! - Flatline: peak-to-peak swing too small over the recent buffer
//!
//! Saturated readings never enter the flatline buffer.

use crate::{
    buffer::CircularBuffer,
    constants::sensors::{
        ADC_FULL_SCALE, ADC_VREF, EMG_BUFFER_LEN, EMG_MIN_PEAK_TO_PEAK,
        EMG_MIN_SAMPLES_FOR_FLATLINE, EMG_SAT_HIGH_ADC, EMG_SAT_HIGH_V, EMG_SAT_LOW_ADC,
    },
};

use super::MuscleReading;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of the EMG assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MuscleStatus {
    /// Signal usable
    #[default]
    Ok,
    /// Clipped at the top of the range
    SaturatedHigh,
    /// Clipped at the bottom of the range
    SaturatedLow,
    /// No activity over the recent window
    Flatline,
}

impl MuscleStatus {
    /// Short machine-readable reason
    pub const fn reason(&self) -> &'static str {
        match self {
            MuscleStatus::Ok => "ok",
            MuscleStatus::SaturatedHigh => "saturated_high",
            MuscleStatus::SaturatedLow => "saturated_low",
            MuscleStatus::Flatline => "flatline",
        }
    }
}

/// Convert a 16-bit scaled ADC count to volts
pub fn adc_to_volts(adc: u16) -> f32 {
    f32::from(adc) / ADC_FULL_SCALE * ADC_VREF
}

/// Stateful EMG assessor (keeps the flatline buffer)
#[derive(Debug, Clone)]
pub struct MuscleAssessor {
    recent: CircularBuffer<u16, EMG_BUFFER_LEN>,
}

impl MuscleAssessor {
    /// Assessor with an empty history
    pub fn new() -> Self {
        Self { recent: CircularBuffer::new() }
    }

    /// Assess one ADC reading and build the frame value
    pub fn assess(&mut self, adc: u16) -> MuscleReading {
        let voltage = adc_to_volts(adc);
        let status = self.classify(adc, voltage);
        let ok = status == MuscleStatus::Ok;

        MuscleReading {
            value: if ok { adc } else { 0 },
            voltage,
            ok,
            status,
        }
    }

    fn classify(&mut self, adc: u16, voltage: f32) -> MuscleStatus {
        if adc >= EMG_SAT_HIGH_ADC || voltage >= EMG_SAT_HIGH_V {
            return MuscleStatus::SaturatedHigh;
        }
        if adc <= EMG_SAT_LOW_ADC {
            return MuscleStatus::SaturatedLow;
        }

        self.recent.push(adc);

        if self.recent.len() >= EMG_MIN_SAMPLES_FOR_FLATLINE {
            let (lo, hi) = self
                .recent
                .iter()
                .fold((u16::MAX, u16::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            if hi - lo < EMG_MIN_PEAK_TO_PEAK {
                return MuscleStatus::Flatline;
            }
        }

        MuscleStatus::Ok
    }
}

impl Default for MuscleAssessor {
    fn default() -> Self {
        Self::new()
    }
}
