//! Collaborator Traits
//!
//! The core talks to the outside world through two narrow seams:
//!
//! - [`driver`] - one [`ChannelDriver`] per channel, wrapping the bus or ADC
//!   access of a single sensor chip
//! - [`sink`] - a [`FrameSink`] receiving every completed frame
//!
//! Both are plain synchronous traits. A driver must return promptly: either
//! a sample, `nb::Error::WouldBlock` when nothing is ready, or a
//! [`ReadError`](crate::errors::ReadError) after its own bounded timeout.
//! Nothing inside a tick ever waits.
//!
//! ## Usage Example
//!
//! ```rust
//! use vitalframe_core::channels::RawSample;
//! use vitalframe_core::errors::ReadResult;
//! use vitalframe_core::time::Timestamp;
//! use vitalframe_core::traits::ChannelDriver;
//!
//! struct SkinThermometer {
//!     celsius: f32,
//! }
//!
//! impl ChannelDriver for SkinThermometer {
//!     fn read(&mut self, _now: Timestamp) -> ReadResult<RawSample> {
//!         Ok(RawSample::BodyTemperature { celsius: self.celsius })
//!     }
//! }
//! ```

pub mod driver;
pub mod sink;

pub use driver::{from_fn, ChannelDriver};
pub use sink::FrameSink;

pub use crate::time::TimeSource;
