//! Channel Kinds, Raw Samples and Per-Channel State
//!
//! ## Overview
//!
//! A channel is one logical sensor data source with its own update cadence.
//! The set of kinds is fixed: each kind has an explicit raw sample shape
//! (what its driver returns) and an explicit output shape (what lands in the
//! frame). Dispatch is a `match` on the kind, never a runtime-shaped object.
//!
//! ```text
//! kind              raw sample                    frame value
//! ─────────────────────────────────────────────────────────────────────────
//! Ecg               value, lead-off ±             value, lead-off ±, any
//! Gsr               ADC count                     ADC count
//! Muscle            ADC count                     value/voltage/ok/status
//! Environment       air °C, %RH                   air °C, %RH
//! BodyTemperature   skin °C                       skin °C (+ fresh flag)
//! Pulse             PPG {red, ir} (drained)       heart rate (BPM or none)
//! ```
//!
//! ## Value-Hold
//!
//! [`ChannelState`] makes holding explicit: `is_fresh` is set only by the
//! tick that stored a new value and cleared by every other tick, so tests can
//! check the hold invariant directly instead of inferring it.

mod muscle;

pub use muscle::{MuscleAssessor, MuscleStatus};

use crate::{
    config::{ChannelConfig, NoData},
    time::{elapsed_ms, Timestamp},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Logical channel identifier
///
/// The discriminant doubles as a stable wire/log id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum ChannelKind {
    /// AD8232 class ECG front end
    Ecg = 0,
    /// Galvanic skin response
    Gsr = 1,
    /// MyoWare class EMG
    Muscle = 2,
    /// DHT22 class air temperature and humidity
    Environment = 3,
    /// MAX30205 class skin temperature
    BodyTemperature = 4,
    /// MAX30102 class PPG, published as heart rate
    Pulse = 5,
}

impl ChannelKind {
    /// All kinds in their canonical order
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::Ecg,
        ChannelKind::Gsr,
        ChannelKind::Muscle,
        ChannelKind::Environment,
        ChannelKind::BodyTemperature,
        ChannelKind::Pulse,
    ];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            ChannelKind::Ecg => "ecg",
            ChannelKind::Gsr => "gsr",
            ChannelKind::Muscle => "muscle",
            ChannelKind::Environment => "environment",
            ChannelKind::BodyTemperature => "body_temperature",
            ChannelKind::Pulse => "pulse",
        }
    }

    /// Get unit of the primary output value
    pub const fn unit(&self) -> &'static str {
        match self {
            ChannelKind::Ecg | ChannelKind::Gsr | ChannelKind::Muscle => "counts",
            ChannelKind::Environment | ChannelKind::BodyTemperature => "°C",
            ChannelKind::Pulse => "bpm",
        }
    }
}

/// One raw reading as returned by a channel driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawSample {
    /// ECG ADC value with electrode lead-off comparators
    Ecg {
        /// 12-bit ADC count
        value: u16,
        /// LO+ comparator output
        lead_off_plus: bool,
        /// LO- comparator output
        lead_off_minus: bool,
    },
    /// GSR ADC value
    Gsr {
        /// ADC count
        value: u16,
    },
    /// EMG envelope ADC value
    Muscle {
        /// Scaled 16-bit ADC count
        adc: u16,
    },
    /// Air temperature and relative humidity
    Environment {
        /// Degrees Celsius
        temperature_c: f32,
        /// Relative humidity, percent
        humidity_pct: f32,
    },
    /// Skin temperature
    BodyTemperature {
        /// Degrees Celsius
        celsius: f32,
    },
    /// One PPG FIFO entry
    Ppg {
        /// Red LED intensity
        red: u32,
        /// Infrared LED intensity
        ir: u32,
    },
}

impl RawSample {
    /// Channel kind this sample belongs to
    pub const fn kind(&self) -> ChannelKind {
        match self {
            RawSample::Ecg { .. } => ChannelKind::Ecg,
            RawSample::Gsr { .. } => ChannelKind::Gsr,
            RawSample::Muscle { .. } => ChannelKind::Muscle,
            RawSample::Environment { .. } => ChannelKind::Environment,
            RawSample::BodyTemperature { .. } => ChannelKind::BodyTemperature,
            RawSample::Ppg { .. } => ChannelKind::Pulse,
        }
    }
}

/// ECG output with the merged lead-off flag
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EcgReading {
    /// ADC count
    pub value: u16,
    /// LO+ comparator output
    pub lead_off_plus: bool,
    /// LO- comparator output
    pub lead_off_minus: bool,
    /// Either electrode detached
    pub lead_off: bool,
}

impl EcgReading {
    /// Merge the two comparator outputs
    pub fn new(value: u16, lead_off_plus: bool, lead_off_minus: bool) -> Self {
        Self {
            value,
            lead_off_plus,
            lead_off_minus,
            lead_off: lead_off_plus || lead_off_minus,
        }
    }
}

/// EMG output after signal assessment
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MuscleReading {
    /// ADC value, forced to 0 when the assessment fails
    pub value: u16,
    /// Raw ADC value converted to volts
    pub voltage: f32,
    /// Whether the assessment passed
    pub ok: bool,
    /// Assessment result
    pub status: MuscleStatus,
}

/// Air conditions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnvironmentReading {
    /// Air temperature, degrees Celsius
    pub temperature_c: f32,
    /// Relative humidity, percent
    pub humidity_pct: f32,
}

/// Published heart-rate estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulseReading {
    /// `None` is the "no reading" sentinel (warm-up, no finger)
    pub bpm: Option<u16>,
}

/// Post-processed channel value as it appears in a frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChannelValue {
    /// Electrocardiogram
    Ecg(EcgReading),
    /// Galvanic skin response ADC count
    Gsr(u16),
    /// Assessed EMG envelope
    Muscle(MuscleReading),
    /// Air conditions
    Environment(EnvironmentReading),
    /// Skin temperature, degrees Celsius
    BodyTemperature(f32),
    /// Heart rate
    Pulse(PulseReading),
}

impl ChannelValue {
    /// Channel kind this value belongs to
    pub const fn kind(&self) -> ChannelKind {
        match self {
            ChannelValue::Ecg(_) => ChannelKind::Ecg,
            ChannelValue::Gsr(_) => ChannelKind::Gsr,
            ChannelValue::Muscle(_) => ChannelKind::Muscle,
            ChannelValue::Environment(_) => ChannelKind::Environment,
            ChannelValue::BodyTemperature(_) => ChannelKind::BodyTemperature,
            ChannelValue::Pulse(_) => ChannelKind::Pulse,
        }
    }

    /// All-zero value for a kind, used by the [`NoData::Zero`] sentinel
    pub fn zero(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Ecg => ChannelValue::Ecg(EcgReading::default()),
            ChannelKind::Gsr => ChannelValue::Gsr(0),
            ChannelKind::Muscle => ChannelValue::Muscle(MuscleReading::default()),
            ChannelKind::Environment => ChannelValue::Environment(EnvironmentReading::default()),
            ChannelKind::BodyTemperature => ChannelValue::BodyTemperature(0.0),
            ChannelKind::Pulse => ChannelValue::Pulse(PulseReading::default()),
        }
    }
}

/// Scheduler-owned state of one channel
///
/// `last_value` and `last_update_time` only change when the scheduler stores
/// a successful reading; `is_fresh` reflects the most recent tick only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelState {
    /// Channel this state belongs to
    pub kind: ChannelKind,
    /// Time between desired samples (ms)
    pub update_period_ms: u32,
    /// Whether frames carry the freshness flag
    pub tracks_freshness: bool,
    /// What to report before the first reading
    pub no_data: NoData,
    /// `None` until the first successful reading
    pub last_value: Option<ChannelValue>,
    /// Time of the last stored reading
    pub last_update_time: Option<Timestamp>,
    /// Set on the tick that stored a new reading
    pub is_fresh: bool,
}

impl ChannelState {
    /// Initial state, no reading yet
    pub fn new(config: &ChannelConfig) -> Self {
        Self {
            kind: config.kind,
            update_period_ms: config.update_period_ms,
            tracks_freshness: config.tracks_freshness,
            no_data: config.no_data,
            last_value: None,
            last_update_time: None,
            is_fresh: false,
        }
    }

    /// A channel that never updated is always due
    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.last_update_time {
            None => true,
            Some(last) => elapsed_ms(last, now) >= u64::from(self.update_period_ms),
        }
    }

    /// Store a new value read at `now` and mark it fresh
    pub fn record(&mut self, value: ChannelValue, now: Timestamp) {
        self.last_value = Some(value);
        self.last_update_time = Some(now);
        self.is_fresh = true;
    }

    /// Keep the previous value and mark it held
    pub fn hold(&mut self) {
        self.is_fresh = false;
    }

    /// Value to report, applying the no-data sentinel
    pub fn reported_value(&self) -> Option<ChannelValue> {
        match (self.last_value, self.no_data) {
            (Some(value), _) => Some(value),
            (None, NoData::Absent) => None,
            (None, NoData::Zero) => Some(ChannelValue::zero(self.kind)),
        }
    }
}
