//! Moving-average smoothing of the raw PPG waveform

use crate::{buffer::CircularBuffer, constants::buffers::MAX_SMOOTHING_WINDOW};

/// Fixed-capacity moving average
///
/// Holds the most recent `capacity` samples; each push evicts the oldest
/// sample once full and returns the mean of what is held. Identical input
/// sequences always give identical outputs.
#[derive(Debug, Clone)]
pub struct SmoothingBuffer {
    window: CircularBuffer<f32, MAX_SMOOTHING_WINDOW>,
}

impl SmoothingBuffer {
    /// `capacity` is clamped to `1..=MAX_SMOOTHING_WINDOW`
    pub fn new(capacity: usize) -> Self {
        Self {
            window: CircularBuffer::with_window(capacity),
        }
    }

    /// Admit a sample and return the mean of the held samples
    pub fn push(&mut self, sample: f32) -> f32 {
        self.window.push(sample);
        // Non-empty after a push
        self.window.mean().unwrap_or(sample)
    }

    /// Samples currently averaged
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Whether no sample was pushed yet
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Averaging window
    pub fn capacity(&self) -> usize {
        self.window.window()
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_partial_window() {
        let mut smoothing = SmoothingBuffer::new(4);
        assert_eq!(smoothing.push(10.0), 10.0);
        assert_eq!(smoothing.push(20.0), 15.0);
        assert_eq!(smoothing.len(), 2);
    }

    #[test]
    fn oldest_sample_leaves_window() {
        let mut smoothing = SmoothingBuffer::new(3);
        smoothing.push(100.0);
        smoothing.push(1.0);
        smoothing.push(2.0);
        // 100 evicted, mean of [1, 2, 3]
        assert_eq!(smoothing.push(3.0), 2.0);
        assert_eq!(smoothing.len(), 3);
    }

    #[test]
    fn clear_restarts_average() {
        let mut smoothing = SmoothingBuffer::new(5);
        smoothing.push(1000.0);
        smoothing.clear();
        assert!(smoothing.is_empty());
        assert_eq!(smoothing.push(7.0), 7.0);
        assert_eq!(smoothing.capacity(), 5);
    }
}
