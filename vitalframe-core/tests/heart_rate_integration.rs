//! End-to-end heart-rate tests through the scheduler
//!
//! A simulated PPG sensor is drained at the master rate while the published
//! estimate refreshes on its own 2 s cadence.

mod common;

use vitalframe_core::{
    channels::ChannelKind,
    config::MonitorConfig,
    frame::Frame,
    heart_rate::EstimatorPhase,
    scheduler::Scheduler,
};

use common::{generators::PpgSimulator, harness::run_for, sample_for, ScriptedDriver};

fn scheduler_with(config: MonitorConfig, ppg: PpgSimulator) -> Scheduler {
    let mut builder = Scheduler::builder(config);
    for kind in ChannelKind::ALL {
        builder = match kind {
            ChannelKind::Pulse => builder.driver(kind, ppg.clone()),
            _ => builder.driver(kind, ScriptedDriver::new(sample_for(kind))),
        };
    }
    builder.build().unwrap()
}

fn heart_rates(frames: &[Frame]) -> Vec<Option<u16>> {
    frames.iter().map(Frame::heart_rate).collect()
}

#[test]
fn converges_to_75_bpm_after_warmup() {
    let mut scheduler = scheduler_with(MonitorConfig::default(), PpgSimulator::new(75));
    let frames = run_for(&mut scheduler, 121);
    let rates = heart_rates(&frames);

    // Nothing published during the 5 s warm-up
    assert!(rates[..50].iter().all(Option::is_none));

    // First recompute after warm-up, then stable
    for (i, rate) in rates.iter().enumerate().skip(60) {
        assert_eq!(*rate, Some(75), "tick {}", i);
    }

    let estimator = scheduler.estimator();
    assert_eq!(estimator.phase(), EstimatorPhase::Tracking);
    let stats = &scheduler.diagnostics().estimator;
    assert!(stats.publishes >= 4);
    assert_eq!(stats.intervals_rejected, 0);
    assert_eq!(stats.finger_losses, 0);
}

#[test]
fn finger_removal_reports_no_reading_at_next_recompute() {
    let ppg = PpgSimulator::new(75).with_finger_off(9000, 9500);
    let mut scheduler = scheduler_with(MonitorConfig::default(), ppg);
    let frames = run_for(&mut scheduler, 181);
    let rates = heart_rates(&frames);

    assert_eq!(rates[80], Some(75));
    // Between recomputes the published value is held
    assert_eq!(rates[95], Some(75));
    // The next recompute must not repeat the stale value
    assert_eq!(rates[100], None);
    // Warm-up restarts from the finger returning at 9.5 s
    assert_eq!(rates[140], None);
    assert_eq!(rates[160], Some(75));
    assert_eq!(rates[180], Some(75));

    assert_eq!(scheduler.diagnostics().estimator.finger_losses, 1);
    assert!(frames[92].ppg_ir.unwrap() < 50_000);
    assert!(frames[100].ppg_ir.unwrap() > 50_000);
}

#[test]
fn noisy_signal_stays_near_true_rate() {
    let ppg = PpgSimulator::new(75).with_noise(4.0);
    let mut scheduler = scheduler_with(MonitorConfig::default(), ppg);
    let frames = run_for(&mut scheduler, 201);

    for frame in &frames[80..] {
        let bpm = frame.heart_rate().expect("estimate after warm-up");
        assert!((72..=78).contains(&bpm), "{} bpm at {} ms", bpm, frame.timestamp);
    }
}

#[test]
fn slower_rhythm_is_measured() {
    let mut scheduler = scheduler_with(MonitorConfig::default(), PpgSimulator::new(60));
    let frames = run_for(&mut scheduler, 121);
    assert_eq!(frames[120].heart_rate(), Some(60));
}

#[test]
fn out_of_range_rate_is_never_published() {
    let mut config = MonitorConfig::default();
    config.heart_rate.max_bpm = 60;
    let mut scheduler = scheduler_with(config, PpgSimulator::new(75));
    let frames = run_for(&mut scheduler, 121);

    assert!(heart_rates(&frames).iter().all(Option::is_none));
    let stats = &scheduler.diagnostics().estimator;
    assert!(stats.intervals_rejected > 0);
    assert_eq!(stats.publishes, 0);
}

#[test]
fn drop_in_dc_level_keeps_estimate() {
    // Last sample at the old level sits high on an upstroke
    let ppg = PpgSimulator::new(75).with_baseline_step(12_140, 80_000.0);
    let mut scheduler = scheduler_with(MonitorConfig::default(), ppg);
    let frames = run_for(&mut scheduler, 201);

    for (i, rate) in heart_rates(&frames).iter().enumerate().skip(60) {
        assert_eq!(*rate, Some(75), "tick {}", i);
    }
    assert!(frames[125].ppg_ir.unwrap() < 82_000);

    let stats = &scheduler.diagnostics().estimator;
    assert_eq!(stats.peaks_baseline_shift, 1);
    assert_eq!(stats.finger_losses, 0);
    // Only the gap across the adjustment is discarded
    assert_eq!(stats.intervals_rejected, 1);
    assert!(scheduler.estimator().intervals().all(|i| i == 40));
}
