//! Multi-Rate Sampling Scheduler
//!
//! ## Overview
//!
//! The scheduler owns every piece of mutable state in the system: the
//! channel table, one driver per channel, the EMG assessor, the heart-rate
//! estimator and the diagnostic counters. A host loop calls [`Scheduler::tick`]
//! at the master rate; each call services every due channel in the fixed
//! configuration order and hands exactly one complete [`Frame`] to the sink.
//!
//! ## One Tick
//!
//! ```text
//! tick(now)
//!   for channel in configuration order:
//!     pulse:   drain PPG FIFO (every tick, bounded)  → estimator.push(ir)
//!              if due: estimator.recompute()         → store BPM, fresh
//!              else:                                   hold
//!     other:   if due: driver.read(now)
//!                ok     → post-process, store, fresh
//!                error  → hold, count
//!              else:                                   hold
//!   assemble frame → sink.emit(frame)
//! ```
//!
//! ## Raw Cadence vs Published Cadence
//!
//! The PPG sensor queues samples internally and overflows if left alone, so
//! its driver is drained on every master tick no matter what the pulse
//! channel's update period says. The period only governs how often the
//! derived heart rate is republished. A channel's physical read cadence and
//! its logical refresh cadence are independent.
//!
//! ## Failure Model
//!
//! Only [`Scheduler::new`] can fail, and only on configuration. Inside a
//! tick a failed read leaves the channel's value and timestamp untouched
//! (so it is retried on the next tick), marks it held, and bumps a counter.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

#[cfg(feature = "std")]
use std::boxed::Box;

use heapless::Vec;

use crate::{
    channels::{
        ChannelKind, ChannelState, ChannelValue, EcgReading, EnvironmentReading,
        MuscleAssessor, PulseReading, RawSample,
    },
    config::MonitorConfig,
    constants::buffers::MAX_CHANNELS,
    diagnostics::Diagnostics,
    errors::{ConfigError, ConfigResult, ReadError},
    frame::{assemble, Frame},
    heart_rate::HeartRateEstimator,
    time::Timestamp,
    traits::{ChannelDriver, FrameSink},
};

const KIND_MISMATCH: ReadError = ReadError::InvalidData {
    reason: "sample kind does not match channel",
};

/// A channel and the driver feeding it
struct Slot {
    state: ChannelState,
    driver: Box<dyn ChannelDriver>,
}

/// Tick-driven owner of all channel state
pub struct Scheduler {
    master_period_ms: u32,
    max_drain_per_tick: usize,
    slots: Vec<Slot, MAX_CHANNELS>,
    muscle: MuscleAssessor,
    estimator: HeartRateEstimator,
    has_pulse: bool,
    diagnostics: Diagnostics,
    sequence: u64,
}

impl Scheduler {
    /// Create a scheduler builder for `config`
    pub fn builder(config: MonitorConfig) -> SchedulerBuilder {
        SchedulerBuilder::new(config)
    }

    /// Validate `config` and pair every channel with its driver
    ///
    /// Fails if the configuration is invalid, a channel has no driver, a
    /// driver targets an unconfigured channel, or a channel gets two drivers.
    pub fn new<I>(config: MonitorConfig, drivers: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (ChannelKind, Box<dyn ChannelDriver>)>,
    {
        config.validate()?;

        let mut attached: [Option<Box<dyn ChannelDriver>>; ChannelKind::ALL.len()] =
            Default::default();
        for (kind, driver) in drivers {
            if config.channel(kind).is_none() {
                return Err(ConfigError::UnconfiguredDriver { channel: kind });
            }
            let slot = &mut attached[kind as usize];
            if slot.is_some() {
                return Err(ConfigError::DuplicateChannel { channel: kind });
            }
            *slot = Some(driver);
        }

        let mut slots = Vec::new();
        for channel in config.channels.iter() {
            let driver = attached[channel.kind as usize]
                .take()
                .ok_or(ConfigError::MissingDriver { channel: channel.kind })?;
            let slot = Slot {
                state: ChannelState::new(channel),
                driver,
            };
            if slots.push(slot).is_err() {
                return Err(ConfigError::TooManyChannels {
                    count: config.channels.len(),
                    max: MAX_CHANNELS,
                });
            }
        }

        log_info!(
            "Scheduler ready: {} channels, master period {} ms",
            slots.len(),
            config.master_period_ms
        );

        Ok(Self {
            master_period_ms: config.master_period_ms,
            max_drain_per_tick: config.max_drain_per_tick,
            has_pulse: config.channel(ChannelKind::Pulse).is_some(),
            slots,
            muscle: MuscleAssessor::new(),
            estimator: HeartRateEstimator::new(config.heart_rate),
            diagnostics: Diagnostics::new(),
            sequence: 0,
        })
    }

    /// Run one master tick and hand the frame to `sink`
    pub fn tick<S: FrameSink + ?Sized>(&mut self, now: Timestamp, sink: &mut S) {
        let frame = self.step(now);
        sink.emit(frame);
    }

    /// Run one master tick and return the frame
    pub fn step(&mut self, now: Timestamp) -> Frame {
        let Self {
            slots,
            muscle,
            estimator,
            diagnostics,
            max_drain_per_tick,
            ..
        } = self;

        diagnostics.ticks = diagnostics.ticks.saturating_add(1);

        for slot in slots.iter_mut() {
            match slot.state.kind {
                ChannelKind::Pulse => {
                    drain_ppg(slot, now, *max_drain_per_tick, estimator, diagnostics);
                    publish_heart_rate(&mut slot.state, now, estimator);
                }
                _ => poll_channel(slot, now, muscle, diagnostics),
            }
        }

        diagnostics.estimator = *estimator.stats();

        let ppg_ir = if self.has_pulse { self.estimator.latest_ir() } else { None };
        let frame = assemble(
            self.sequence,
            now,
            self.slots.iter().map(|slot| &slot.state),
            ppg_ir,
        );
        self.sequence += 1;
        frame
    }

    /// State of one channel
    pub fn channel(&self, kind: ChannelKind) -> Option<&ChannelState> {
        self.slots.iter().map(|slot| &slot.state).find(|state| state.kind == kind)
    }

    /// Channel states in processing order
    pub fn channels(&self) -> impl Iterator<Item = &ChannelState> + '_ {
        self.slots.iter().map(|slot| &slot.state)
    }

    /// Read and estimator counters
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Heart-rate estimator fed by the pulse channel
    pub fn estimator(&self) -> &HeartRateEstimator {
        &self.estimator
    }

    /// Tick period the scheduler was configured with
    pub fn master_period_ms(&self) -> u32 {
        self.master_period_ms
    }

    /// Sequence number the next frame will carry
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Read a regular channel if it is due
fn poll_channel(slot: &mut Slot, now: Timestamp, muscle: &mut MuscleAssessor, diagnostics: &mut Diagnostics) {
    let kind = slot.state.kind;
    if !slot.state.is_due(now) {
        slot.state.hold();
        return;
    }

    let counters = diagnostics.channel_mut(kind);
    match slot.driver.read(now) {
        Ok(sample) => match post_process(kind, sample, muscle) {
            Some(value) => {
                slot.state.record(value, now);
                counters.record_ok();
            }
            None => {
                slot.state.hold();
                counters.record_error(KIND_MISMATCH);
                log_warn!("{} driver returned a {:?} sample", kind.name(), sample.kind());
            }
        },
        Err(nb::Error::WouldBlock) => {
            slot.state.hold();
            counters.record_unavailable();
        }
        Err(nb::Error::Other(error)) => {
            slot.state.hold();
            counters.record_error(error);
            log_warn!("{} read failed: {}", kind.name(), error);
        }
    }
}

/// Turn a raw sample into the channel's frame value
fn post_process(kind: ChannelKind, sample: RawSample, muscle: &mut MuscleAssessor) -> Option<ChannelValue> {
    if sample.kind() != kind {
        return None;
    }

    let value = match sample {
        RawSample::Ecg { value, lead_off_plus, lead_off_minus } => {
            ChannelValue::Ecg(EcgReading::new(value, lead_off_plus, lead_off_minus))
        }
        RawSample::Gsr { value } => ChannelValue::Gsr(value),
        RawSample::Muscle { adc } => ChannelValue::Muscle(muscle.assess(adc)),
        RawSample::Environment { temperature_c, humidity_pct } => {
            ChannelValue::Environment(EnvironmentReading { temperature_c, humidity_pct })
        }
        RawSample::BodyTemperature { celsius } => ChannelValue::BodyTemperature(celsius),
        // Raw PPG never becomes a frame value directly
        RawSample::Ppg { .. } => return None,
    };
    Some(value)
}

/// Empty the PPG FIFO into the estimator, at most `limit` samples
fn drain_ppg(
    slot: &mut Slot,
    now: Timestamp,
    limit: usize,
    estimator: &mut HeartRateEstimator,
    diagnostics: &mut Diagnostics,
) {
    let mut drained = 0usize;

    while drained < limit {
        match slot.driver.read(now) {
            Ok(RawSample::Ppg { ir, .. }) => {
                estimator.push(ir);
                diagnostics.channel_mut(ChannelKind::Pulse).record_ok();
                drained += 1;
            }
            Ok(other) => {
                diagnostics.channel_mut(ChannelKind::Pulse).record_error(KIND_MISMATCH);
                log_warn!("pulse driver returned a {:?} sample", other.kind());
                break;
            }
            Err(nb::Error::WouldBlock) => break,
            Err(nb::Error::Other(error)) => {
                diagnostics.channel_mut(ChannelKind::Pulse).record_error(error);
                log_warn!("pulse read failed after {} samples: {}", drained, error);
                break;
            }
        }
    }

    if drained == limit {
        diagnostics.drain_limit_hits = diagnostics.drain_limit_hits.saturating_add(1);
        log_warn!("PPG drain stopped at {} samples", limit);
    }
    diagnostics.ppg_samples_drained = diagnostics.ppg_samples_drained.saturating_add(drained as u64);
}

/// Republish the heart rate when the pulse channel is due
fn publish_heart_rate(state: &mut ChannelState, now: Timestamp, estimator: &mut HeartRateEstimator) {
    if state.is_due(now) {
        let bpm = estimator.recompute();
        state.record(ChannelValue::Pulse(PulseReading { bpm }), now);
    } else {
        state.hold();
    }
}

/// Builder pairing a configuration with channel drivers
pub struct SchedulerBuilder {
    config: MonitorConfig,
    drivers: Vec<(ChannelKind, Box<dyn ChannelDriver>), MAX_CHANNELS>,
    /// Drivers offered, including any that did not fit
    offered: usize,
}

impl SchedulerBuilder {
    /// Builder with no drivers attached
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            drivers: Vec::new(),
            offered: 0,
        }
    }

    /// Attach the driver for `kind`
    pub fn driver<D: ChannelDriver + 'static>(mut self, kind: ChannelKind, driver: D) -> Self {
        self.offered += 1;
        let driver: Box<dyn ChannelDriver> = Box::new(driver);
        self.drivers.push((kind, driver)).ok();
        self
    }

    /// Validate and build
    pub fn build(self) -> ConfigResult<Scheduler> {
        if self.offered > MAX_CHANNELS {
            return Err(ConfigError::TooManyChannels {
                count: self.offered,
                max: MAX_CHANNELS,
            });
        }
        Scheduler::new(self.config, self.drivers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelConfig;
    use crate::traits::from_fn;

    fn gsr(value: u16) -> impl ChannelDriver {
        from_fn(move |_| Ok(RawSample::Gsr { value }))
    }

    fn skin() -> impl ChannelDriver {
        from_fn(|_| Ok(RawSample::BodyTemperature { celsius: 36.0 }))
    }

    fn two_channels() -> MonitorConfig {
        MonitorConfig::new(100)
            .with_channel(ChannelConfig::new(ChannelKind::Gsr, 100))
            .unwrap()
            .with_channel(ChannelConfig::new(ChannelKind::BodyTemperature, 1000))
            .unwrap()
    }

    #[test]
    fn build_requires_driver_per_channel() {
        let result = Scheduler::builder(two_channels())
            .driver(ChannelKind::Gsr, gsr(1))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingDriver { channel: ChannelKind::BodyTemperature })
        ));
    }

    #[test]
    fn build_rejects_stray_and_duplicate_drivers() {
        let result = Scheduler::builder(two_channels())
            .driver(ChannelKind::Gsr, gsr(1))
            .driver(ChannelKind::BodyTemperature, skin())
            .driver(ChannelKind::Pulse, from_fn(|_| Err(nb::Error::WouldBlock)))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::UnconfiguredDriver { channel: ChannelKind::Pulse })
        ));

        let result = Scheduler::builder(two_channels())
            .driver(ChannelKind::Gsr, gsr(1))
            .driver(ChannelKind::Gsr, gsr(2))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateChannel { channel: ChannelKind::Gsr })
        ));
    }

    #[test]
    fn invalid_config_fails_before_first_tick() {
        let mut config = two_channels();
        config.master_period_ms = 0;
        let result = Scheduler::builder(config)
            .driver(ChannelKind::Gsr, gsr(1))
            .driver(ChannelKind::BodyTemperature, skin())
            .build();
        assert!(matches!(result, Err(ConfigError::ZeroMasterPeriod)));
    }

    #[test]
    fn mismatched_sample_is_counted_not_stored() {
        let mut scheduler = Scheduler::builder(two_channels())
            .driver(ChannelKind::Gsr, from_fn(|_| Ok(RawSample::Muscle { adc: 5 })))
            .driver(ChannelKind::BodyTemperature, skin())
            .build()
            .unwrap();

        let frame = scheduler.step(0);
        assert_eq!(frame.value(ChannelKind::Gsr), None);
        let counters = scheduler.diagnostics().channel(ChannelKind::Gsr);
        assert_eq!(counters.read_errors, 1);
        assert_eq!(counters.last_error, Some(KIND_MISMATCH));
    }

    #[test]
    fn muscle_and_ecg_are_post_processed() {
        let config = MonitorConfig::new(100)
            .with_channel(ChannelConfig::new(ChannelKind::Ecg, 100))
            .unwrap()
            .with_channel(ChannelConfig::new(ChannelKind::Muscle, 100))
            .unwrap();
        let mut scheduler = Scheduler::builder(config)
            .driver(ChannelKind::Ecg, from_fn(|_| {
                Ok(RawSample::Ecg { value: 2048, lead_off_plus: false, lead_off_minus: true })
            }))
            .driver(ChannelKind::Muscle, from_fn(|_| Ok(RawSample::Muscle { adc: 65_000 })))
            .build()
            .unwrap();

        let frame = scheduler.step(0);
        match frame.value(ChannelKind::Ecg) {
            Some(ChannelValue::Ecg(ecg)) => assert!(ecg.lead_off),
            other => panic!("unexpected {:?}", other),
        }
        match frame.value(ChannelKind::Muscle) {
            Some(ChannelValue::Muscle(emg)) => {
                assert!(!emg.ok);
                assert_eq!(emg.value, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ppg_drain_is_bounded() {
        let mut config = MonitorConfig::new(100)
            .with_channel(ChannelConfig::new(ChannelKind::Pulse, 2000))
            .unwrap();
        config.max_drain_per_tick = 4;
        let mut scheduler = Scheduler::builder(config)
            .driver(ChannelKind::Pulse, from_fn(|_| Ok(RawSample::Ppg { red: 0, ir: 80_000 })))
            .build()
            .unwrap();

        let frame = scheduler.step(0);
        let diagnostics = scheduler.diagnostics();
        assert_eq!(diagnostics.ppg_samples_drained, 4);
        assert_eq!(diagnostics.drain_limit_hits, 1);
        assert_eq!(diagnostics.estimator.samples, 4);
        assert_eq!(frame.ppg_ir, Some(80_000));
    }

    #[test]
    fn sequence_and_timestamp_follow_ticks() {
        let mut scheduler = Scheduler::builder(two_channels())
            .driver(ChannelKind::Gsr, gsr(7))
            .driver(ChannelKind::BodyTemperature, skin())
            .build()
            .unwrap();

        let mut frames = std::vec::Vec::new();
        for i in 0..3u64 {
            scheduler.tick(i * 100, &mut |frame: Frame| frames.push(frame));
        }
        let stamps: std::vec::Vec<_> = frames.iter().map(|f| (f.sequence, f.timestamp)).collect();
        assert_eq!(stamps, vec![(0, 0), (1, 100), (2, 200)]);
        assert_eq!(frames[2].ppg_ir, None);
        assert_eq!(scheduler.sequence(), 3);
    }
}
