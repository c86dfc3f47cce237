//! Simulated Six-Sensor Monitor Example
//!
//! Runs the reference deployment (ECG, GSR, EMG, air, skin temperature and
//! PPG pulse) against simulated drivers and prints one JSON frame per
//! second, the way the device streams them over its serial port.
//!
//! ## What You'll Learn
//!
//! - Attaching one driver per channel with the scheduler builder
//! - Driving the scheduler from a `TickLoop`
//! - Reading freshness flags and diagnostics
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_simulated_monitor
//! ```

use vitalframe_core::{
    channels::{ChannelKind, RawSample},
    config::MonitorConfig,
    errors::ReadError,
    frame::Frame,
    runner::TickLoop,
    scheduler::Scheduler,
    time::{ManualClock, Timestamp},
    traits::from_fn,
};

/// PPG samples every 20 ms (50 Hz)
const PPG_SAMPLE_MS: u64 = 20;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("vitalframe Simulated Monitor");
    println!("============================\n");

    let config = MonitorConfig::default();
    println!("Master tick: {} ms", config.master_period_ms);
    for channel in &config.channels {
        println!(
            "  {:<17} every {:>4} ms  freshness: {}",
            channel.kind.name(),
            channel.update_period_ms,
            channel.tracks_freshness
        );
    }
    println!();

    // 72 bpm pulse: one beat every 833 ms
    let mut next_ppg = 0u64;
    let ppg = from_fn(move |now: Timestamp| {
        if next_ppg * PPG_SAMPLE_MS > now {
            return Err(nb::Error::WouldBlock);
        }
        let t = (next_ppg * PPG_SAMPLE_MS) as f32 / 1000.0;
        next_ppg += 1;
        let ir = 110_000.0 + 1200.0 * (2.0 * std::f32::consts::PI * t * 1.2).sin();
        Ok(RawSample::Ppg { red: (ir * 0.8) as u32, ir: ir as u32 })
    });

    // Air sensor misses every fifth read, like a DHT22 with a flaky line
    let mut air_reads = 0u32;
    let air = from_fn(move |_| {
        air_reads += 1;
        if air_reads % 5 == 0 {
            Err(nb::Error::Other(ReadError::Timeout))
        } else {
            Ok(RawSample::Environment { temperature_c: 22.4, humidity_pct: 43.0 })
        }
    });

    let mut emg_phase = 0u16;
    let emg = from_fn(move |_| {
        emg_phase = (emg_phase + 1) % 8;
        Ok(RawSample::Muscle { adc: 18_000 + emg_phase * 600 })
    });

    let scheduler = Scheduler::builder(config)
        .driver(ChannelKind::Ecg, from_fn(|now: Timestamp| {
            Ok(RawSample::Ecg {
                value: 2048 + (now % 400) as u16,
                lead_off_plus: false,
                lead_off_minus: false,
            })
        }))
        .driver(ChannelKind::Gsr, from_fn(|_| Ok(RawSample::Gsr { value: 1870 })))
        .driver(ChannelKind::Muscle, emg)
        .driver(ChannelKind::Environment, air)
        .driver(ChannelKind::BodyTemperature, from_fn(|_| Ok(RawSample::BodyTemperature { celsius: 36.4 })))
        .driver(ChannelKind::Pulse, ppg)
        .build()?;

    // Simulated time: no real sleeping
    let mut runner = TickLoop::new(scheduler, ManualClock::new(0));
    let mut print_every_second = |frame: Frame| {
        if frame.sequence % 10 == 0 {
            match serde_json::to_string(&frame) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("serialization failed: {}", e),
            }
        }
    };
    let ticks = runner.run(&mut print_every_second, Some(150));

    let scheduler = runner.into_inner();
    let diagnostics = scheduler.diagnostics();
    println!("\nRan {} ticks", ticks);
    println!("Heart rate:        {:?} bpm", scheduler.estimator().current());
    println!("PPG samples:       {}", diagnostics.ppg_samples_drained);
    println!("Beats accepted:    {}", diagnostics.estimator.peaks_accepted);
    println!(
        "Air read errors:   {} (last: {:?})",
        diagnostics.channel(ChannelKind::Environment).read_errors,
        diagnostics.channel(ChannelKind::Environment).last_error
    );

    Ok(())
}
