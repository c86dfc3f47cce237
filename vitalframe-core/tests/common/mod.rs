//! Common test utilities for integration tests
//!
//! This module provides:
//! - Scripted channel drivers with shared call counters
//! - A simulated PPG sensor FIFO (see [`generators`])
//! - A collecting frame sink and tick-running helpers (see [`harness`])

#![allow(dead_code)]

use std::{cell::Cell, rc::Rc};

use vitalframe_core::{
    channels::{ChannelKind, RawSample},
    errors::{ReadError, ReadResult},
    time::Timestamp,
    traits::ChannelDriver,
};

pub mod generators;
pub mod harness;

/// Call counter readable after the driver moved into a scheduler
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Rc<Cell<usize>>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.get()
    }

    fn bump(&self) -> usize {
        let n = self.0.get() + 1;
        self.0.set(n);
        n
    }
}

/// Driver returning a fixed sample, failing on chosen calls (1-based)
pub struct ScriptedDriver {
    sample: RawSample,
    failures: Vec<(usize, nb::Error<ReadError>)>,
    calls: CallCounter,
    /// Incremented value for scalar kinds so held values are recognisable
    step: u16,
}

impl ScriptedDriver {
    pub fn new(sample: RawSample) -> Self {
        Self {
            sample,
            failures: Vec::new(),
            calls: CallCounter::default(),
            step: 0,
        }
    }

    /// Fail the `call`-th read with `error`
    pub fn fail_on(mut self, call: usize, error: ReadError) -> Self {
        self.failures.push((call, nb::Error::Other(error)));
        self
    }

    /// Report "nothing ready" on the `call`-th read
    pub fn unavailable_on(mut self, call: usize) -> Self {
        self.failures.push((call, nb::Error::WouldBlock));
        self
    }

    /// Every successful read returns a value one higher than the last
    pub fn counting(mut self) -> Self {
        self.step = 1;
        self
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl ChannelDriver for ScriptedDriver {
    fn read(&mut self, _now: Timestamp) -> ReadResult<RawSample> {
        let call = self.calls.bump();
        if let Some((_, error)) = self.failures.iter().find(|(n, _)| *n == call) {
            return Err(error.clone());
        }

        let sample = self.sample;
        if self.step > 0 {
            self.sample = match sample {
                RawSample::Gsr { value } => RawSample::Gsr { value: value + self.step },
                RawSample::Muscle { adc } => RawSample::Muscle { adc: adc + self.step },
                RawSample::BodyTemperature { celsius } => {
                    RawSample::BodyTemperature { celsius: celsius + 0.1 }
                }
                RawSample::Environment { temperature_c, humidity_pct } => RawSample::Environment {
                    temperature_c: temperature_c + 0.1,
                    humidity_pct,
                },
                other => other,
            };
        }
        Ok(sample)
    }
}

/// Driver that never delivers
pub struct DeadDriver;

impl ChannelDriver for DeadDriver {
    fn read(&mut self, _now: Timestamp) -> ReadResult<RawSample> {
        Err(nb::Error::Other(ReadError::NotPresent))
    }
}

/// Plausible raw sample for each channel kind
pub fn sample_for(kind: ChannelKind) -> RawSample {
    match kind {
        ChannelKind::Ecg => RawSample::Ecg { value: 2048, lead_off_plus: false, lead_off_minus: false },
        ChannelKind::Gsr => RawSample::Gsr { value: 1850 },
        ChannelKind::Muscle => RawSample::Muscle { adc: 21_000 },
        ChannelKind::Environment => RawSample::Environment { temperature_c: 22.5, humidity_pct: 41.0 },
        ChannelKind::BodyTemperature => RawSample::BodyTemperature { celsius: 36.6 },
        ChannelKind::Pulse => RawSample::Ppg { red: 90_000, ir: 100_000 },
    }
}
