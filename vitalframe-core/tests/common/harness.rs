//! Tick-running helpers

use vitalframe_core::{
    frame::Frame,
    scheduler::Scheduler,
    time::Timestamp,
    traits::FrameSink,
};

/// Sink keeping every frame
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub frames: Vec<Frame>,
}

impl FrameSink for CollectingSink {
    fn emit(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

/// Tick `scheduler` `ticks` times at `period` ms starting from `start`
pub fn run_ticks(scheduler: &mut Scheduler, start: Timestamp, period: u64, ticks: u64) -> Vec<Frame> {
    let mut sink = CollectingSink::default();
    for i in 0..ticks {
        scheduler.tick(start + i * period, &mut sink);
    }
    sink.frames
}

/// Tick at the scheduler's own master period from time zero
pub fn run_for(scheduler: &mut Scheduler, ticks: u64) -> Vec<Frame> {
    let period = u64::from(scheduler.master_period_ms());
    run_ticks(scheduler, 0, period, ticks)
}
