//! Tick and Update Period Constants
//!
//! The master tick runs at the rate of the fastest channel. Slow channels
//! (environment, body temperature) are read on their own periods and held in
//! between.

/// Milliseconds per second.
pub const MS_PER_SECOND: u32 = 1000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Master tick period (ms), 10 Hz output.
pub const MASTER_TICK_MS: u32 = 100;

/// ECG waveform channel period (ms).
pub const ECG_PERIOD_MS: u32 = 100;

/// Galvanic skin response channel period (ms).
pub const GSR_PERIOD_MS: u32 = 100;

/// EMG channel period (ms).
pub const MUSCLE_PERIOD_MS: u32 = 100;

/// Air temperature/humidity channel period (ms).
///
/// DHT22 class sensors must not be polled faster than every 2 s.
pub const ENVIRONMENT_PERIOD_MS: u32 = 2000;

/// Body temperature channel period (ms).
pub const BODY_TEMPERATURE_PERIOD_MS: u32 = 1000;

/// Upper bound on PPG samples drained in one tick.
///
/// At 50 Hz a 100 ms tick normally finds 5 samples; the bound keeps a tick
/// finite if a driver misbehaves and never reports an empty FIFO.
pub const MAX_DRAIN_PER_TICK: usize = 32;
