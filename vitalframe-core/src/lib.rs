//! Multi-rate physiological sensor scheduler for vitalframe
//!
//! Samples several body sensors, each at its own cadence, and emits one
//! complete frame per master tick. The PPG stream is turned into a stable
//! heart rate by a streaming peak-detection estimator.
//!
//! Key constraints:
//! - Runs on a microcontroller (`no_std`, fixed storage, one `Box` per driver at start-up)
//! - No blocking and no failure inside a tick
//! - Configuration errors surface before the first tick and nowhere else
//!
//! ```no_run
//! use vitalframe_core::{MonitorConfig, Scheduler, ChannelKind, RawSample};
//! use vitalframe_core::traits::from_fn;
//!
//! let mut scheduler = Scheduler::builder(MonitorConfig::default())
//!     .driver(ChannelKind::Ecg, from_fn(|_| Ok(RawSample::Ecg { value: 2048, lead_off_plus: false, lead_off_minus: false })))
//!     .driver(ChannelKind::Gsr, from_fn(|_| Ok(RawSample::Gsr { value: 1900 })))
//!     .driver(ChannelKind::Muscle, from_fn(|_| Ok(RawSample::Muscle { adc: 21_000 })))
//!     .driver(ChannelKind::Environment, from_fn(|_| Ok(RawSample::Environment { temperature_c: 22.5, humidity_pct: 41.0 })))
//!     .driver(ChannelKind::BodyTemperature, from_fn(|_| Ok(RawSample::BodyTemperature { celsius: 36.6 })))
//!     .driver(ChannelKind::Pulse, from_fn(|_| Err(nb::Error::WouldBlock)))
//!     .build()?;
//!
//! // Called every 100 ms by the host
//! let frame = scheduler.step(0);
//! assert_eq!(frame.len(), 6);
//! # Ok::<(), vitalframe_core::ConfigError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[macro_use]
mod macros;

pub mod buffer;
pub mod channels;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod errors;
pub mod frame;
pub mod heart_rate;
pub mod scheduler;
pub mod time;
pub mod traits;

#[cfg(feature = "std")]
pub mod runner;

// Public API
pub use channels::{ChannelKind, ChannelState, ChannelValue, RawSample};
pub use config::{ChannelConfig, HeartRateConfig, MonitorConfig, NoData};
pub use diagnostics::Diagnostics;
pub use errors::{ConfigError, ConfigResult, ReadError, ReadResult};
pub use frame::{Frame, FrameEntry};
pub use heart_rate::{EstimatorPhase, HeartRateEstimator};
pub use scheduler::{Scheduler, SchedulerBuilder};
pub use traits::{ChannelDriver, FrameSink};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
