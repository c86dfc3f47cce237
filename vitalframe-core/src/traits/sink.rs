//! Frame sink contract

use crate::frame::Frame;

/// Consumer of completed frames
///
/// Called exactly once per master tick. Serialization, transport and
/// backpressure are the sink's own business.
pub trait FrameSink {
    /// Take ownership of one frame
    fn emit(&mut self, frame: Frame);
}

impl<F> FrameSink for F
where
    F: FnMut(Frame),
{
    fn emit(&mut self, frame: Frame) {
        self(frame)
    }
}
