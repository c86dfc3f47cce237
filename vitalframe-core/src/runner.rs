//! Host-side fixed-period tick loop
//!
//! The core never sleeps; waiting between ticks is the host's job. On a
//! hosted target [`TickLoop`] does it: tick, hand the frame to the sink,
//! then wait for the next deadline. Deadlines advance by exactly one master
//! period so a slow tick does not shift the schedule.
//!
//! ```rust
//! use vitalframe_core::channels::{ChannelKind, RawSample};
//! use vitalframe_core::config::{ChannelConfig, MonitorConfig};
//! use vitalframe_core::frame::Frame;
//! use vitalframe_core::runner::TickLoop;
//! use vitalframe_core::scheduler::Scheduler;
//! use vitalframe_core::time::ManualClock;
//! use vitalframe_core::traits::from_fn;
//!
//! let config = MonitorConfig::new(100)
//!     .with_channel(ChannelConfig::new(ChannelKind::Gsr, 100))?;
//! let scheduler = Scheduler::builder(config)
//!     .driver(ChannelKind::Gsr, from_fn(|_| Ok(RawSample::Gsr { value: 900 })))
//!     .build()?;
//!
//! let mut frames = Vec::new();
//! let mut runner = TickLoop::new(scheduler, ManualClock::new(0));
//! let ticks = runner.run(&mut |frame: Frame| frames.push(frame), Some(5));
//!
//! assert_eq!(ticks, 5);
//! assert_eq!(frames.len(), 5);
//! # Ok::<(), vitalframe_core::ConfigError>(())
//! ```

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use crate::{
    constants::timing::MS_PER_SECOND,
    heart_rate::EstimatorPhase,
    scheduler::Scheduler,
    time::{ManualClock, MonotonicClock, TimeSource, Timestamp},
    traits::FrameSink,
};

/// Time source that can also wait for a deadline
pub trait Pacer: TimeSource {
    /// Return once `now() >= deadline`
    fn wait_until(&self, deadline: Timestamp);
}

impl Pacer for MonotonicClock {
    fn wait_until(&self, deadline: Timestamp) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(Duration::from_millis(deadline - now));
        }
    }
}

/// Simulated time jumps straight to the deadline
impl Pacer for ManualClock {
    fn wait_until(&self, deadline: Timestamp) {
        if deadline > self.now() {
            self.set(deadline);
        }
    }
}

/// Shared flag asking a running [`TickLoop`] to return
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Ask the loop to return
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether a stop was requested
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Drives a [`Scheduler`] at its master period
pub struct TickLoop<C: Pacer> {
    scheduler: Scheduler,
    clock: C,
    stop: StopHandle,
    /// Whole seconds of warm-up last reported
    warmup_reported: Option<u32>,
}

impl<C: Pacer> TickLoop<C> {
    /// Loop over `scheduler` paced by `clock`
    pub fn new(scheduler: Scheduler, clock: C) -> Self {
        Self {
            scheduler,
            clock,
            stop: StopHandle::default(),
            warmup_reported: None,
        }
    }

    /// Handle that stops [`run`](Self::run) before its next tick
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Tick until stopped or until `max_ticks` ticks ran; returns ticks run
    pub fn run<S: FrameSink + ?Sized>(&mut self, sink: &mut S, max_ticks: Option<u64>) -> u64 {
        let period = u64::from(self.scheduler.master_period_ms());
        let mut deadline = self.clock.now();
        let mut ticks = 0u64;

        log_info!("Tick loop started, period {} ms", period);

        while !self.stop.is_stopped() && max_ticks.map_or(true, |max| ticks < max) {
            self.scheduler.tick(self.clock.now(), sink);
            ticks += 1;
            self.report_warmup();

            deadline += period;
            self.clock.wait_until(deadline);
        }

        log_info!("Tick loop finished after {} ticks", ticks);
        ticks
    }

    /// Log warm-up progress once per second of collected signal
    fn report_warmup(&mut self) {
        let estimator = self.scheduler.estimator();
        if !estimator.finger_present() {
            self.warmup_reported = None;
            return;
        }

        let total = estimator.config().warmup_ms / MS_PER_SECOND;
        match estimator.phase() {
            EstimatorPhase::Collecting => {
                let seconds = (estimator.warmup_progress() * total as f32) as u32;
                if self.warmup_reported != Some(seconds) {
                    self.warmup_reported = Some(seconds);
                    log_info!("Collecting samples... {}/{} seconds", seconds, total);
                }
            }
            EstimatorPhase::Tracking => {
                if self.warmup_reported != Some(total + 1) {
                    log_info!("Warm-up complete, tracking heart rate");
                }
                // Past the last collecting value so this logs once
                self.warmup_reported = Some(total + 1);
            }
        }
    }

    /// Scheduler being driven
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Clock pacing the loop
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Give back the scheduler
    pub fn into_inner(self) -> Scheduler {
        self.scheduler
    }
}
