//! Finger Removal and Recovery Example
//!
//! Feeds the heart-rate estimator directly with a 75 bpm PPG signal, lifts
//! the finger for one second, and shows how the published estimate reacts
//! at each 2 s recompute.
//!
//! ## Timeline
//!
//! ```text
//! 0 s ──── warm-up ──── 5 s ── tracking ── 10 s  finger off  11 s ── warm-up ── 16 s ── tracking
//! ```
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_finger_removal
//! ```

use vitalframe_core::{
    config::HeartRateConfig,
    heart_rate::{HeartRateEstimator, PeakOutcome},
};

const RATE_HZ: u64 = 50;
const BEAT_SAMPLES: u64 = 40;

fn ir_at(n: u64) -> u32 {
    let t_ms = n * 1000 / RATE_HZ;
    if (10_000..11_000).contains(&t_ms) {
        // Ambient light only
        return 4_000;
    }
    let phase = (n % BEAT_SAMPLES) as f32 / BEAT_SAMPLES as f32;
    (95_000.0 + 900.0 * (2.0 * std::f32::consts::PI * phase).sin()) as u32
}

fn main() {
    println!("vitalframe Finger Removal Example");
    println!("=================================\n");

    let config = HeartRateConfig::default();
    let recompute_samples = config.ms_to_samples(config.recompute_period_ms) as u64;
    let mut estimator = HeartRateEstimator::new(config);

    let mut beats = 0;
    for n in 0..(24 * RATE_HZ) {
        if let Some(PeakOutcome::Accepted(_)) = estimator.push(ir_at(n)) {
            beats += 1;
        }

        if (n + 1) % recompute_samples == 0 {
            let seconds = (n + 1) / RATE_HZ;
            let bpm = estimator.recompute();
            println!(
                "{:>3} s  finger: {:<5}  phase: {:<10}  beats: {:>3}  published: {}",
                seconds,
                estimator.finger_present(),
                format!("{:?}", estimator.phase()),
                beats,
                bpm.map_or("no reading".to_string(), |b| format!("{} bpm", b)),
            );
        }
    }

    let stats = estimator.stats();
    println!("\nFinger losses:      {}", stats.finger_losses);
    println!("Publishes / holds:  {} / {}", stats.publishes, stats.holds);
    println!("Rejected (refractory/amplitude/threshold): {}/{}/{}",
        stats.peaks_refractory, stats.peaks_low_amplitude, stats.peaks_below_threshold);
}
