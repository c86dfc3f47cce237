//! Channel driver contract

use crate::{channels::RawSample, errors::ReadResult, time::Timestamp};

/// Source of raw samples for one channel
///
/// ## Return Values
///
/// - `Ok(sample)`: a reading of the channel's kind
/// - `Err(nb::Error::WouldBlock)`: nothing ready; for the PPG channel this
///   means the sensor FIFO is empty
/// - `Err(nb::Error::Other(e))`: transient failure, absorbed by the scheduler
///
/// The PPG driver is called repeatedly within one tick until it reports
/// `WouldBlock`; every other driver is called at most once per tick.
pub trait ChannelDriver {
    /// Read one sample
    fn read(&mut self, now: Timestamp) -> ReadResult<RawSample>;
}

/// Driver backed by a closure, see [`from_fn`]
#[derive(Debug, Clone)]
pub struct FromFn<F> {
    read: F,
}

/// Wrap a closure as a [`ChannelDriver`]
///
/// ```rust
/// use vitalframe_core::channels::RawSample;
/// use vitalframe_core::traits::{driver, ChannelDriver};
///
/// let mut gsr = driver::from_fn(|_now| Ok(RawSample::Gsr { value: 1850 }));
/// assert_eq!(gsr.read(0), Ok(RawSample::Gsr { value: 1850 }));
/// ```
pub fn from_fn<F>(read: F) -> FromFn<F>
where
    F: FnMut(Timestamp) -> ReadResult<RawSample>,
{
    FromFn { read }
}

impl<F> ChannelDriver for FromFn<F>
where
    F: FnMut(Timestamp) -> ReadResult<RawSample>,
{
    fn read(&mut self, now: Timestamp) -> ReadResult<RawSample> {
        (self.read)(now)
    }
}
