//! Fixed-Storage Circular Buffer with a Runtime Window
//!
//! ## Overview
//!
//! Every sliding window in the crate (PPG smoothing, adaptive threshold,
//! inter-beat interval history, EMG flatline check) is one of these. Storage
//! is an inline array sized by a const generic, so nothing touches the heap,
//! while the *window* (how many of the most recent items are kept) is chosen
//! at runtime from configuration, up to `N`.
//!
//! ## Eviction Rule
//!
//! Strict FIFO: once `window` items are held, pushing a new item evicts the
//! oldest one in the same call. The buffer never holds more than `window`
//! items and never skips a slot.
//!
//! ```text
//! window = 3, storage N = 4
//!
//! push a  → [a]
//! push b  → [a, b]
//! push c  → [a, b, c]
//! push d  → [b, c, d]      (a evicted)
//! ```
//!
//! ## Memory Layout
//!
//! ```text
//! CircularBuffer<f32, 32>:
//! ├── data: 32 × 4 bytes = 128 bytes
//! ├── head: usize (index of oldest item)
//! ├── len: usize
//! └── window: usize
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use vitalframe_core::buffer::CircularBuffer;
//!
//! let mut history: CircularBuffer<u32, 8> = CircularBuffer::with_window(3);
//!
//! history.push(40);
//! history.push(41);
//! history.push(39);
//! let evicted = history.push(40);
//!
//! assert_eq!(evicted, Some(40));
//! assert_eq!(history.len(), 3);
//! assert_eq!(history.last(), Some(&40));
//! ```

/// Fixed-size circular buffer keeping the most recent `window` items
///
/// ## Type Parameters
///
/// - `T`: item type, `Copy` so slots can be pre-filled without `unsafe`
/// - `N`: storage capacity, the upper bound for any runtime window
///
/// ## Internal Invariants
///
/// - `1 <= window <= N`
/// - `len <= window`
/// - `head < N`; logical item `i` lives at `(head + i) % N`
#[derive(Clone, Debug)]
pub struct CircularBuffer<T: Copy + Default, const N: usize> {
    data: [T; N],

    /// Physical index of the oldest item
    head: usize,

    /// Current number of valid items
    len: usize,

    /// Maximum number of items retained
    window: usize,
}

impl<T: Copy + Default, const N: usize> CircularBuffer<T, N> {
    /// Creates an empty buffer whose window is the full storage capacity
    pub fn new() -> Self {
        Self::with_window(N)
    }

    /// Creates an empty buffer keeping at most `window` items
    ///
    /// The window is clamped into `1..=N`; configuration validation is
    /// expected to reject out-of-range values before this point.
    pub fn with_window(window: usize) -> Self {
        Self {
            data: [T::default(); N],
            head: 0,
            len: 0,
            window: window.clamp(1, N),
        }
    }

    /// Adds an item, returning the evicted oldest item when the window was full
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.len < self.window {
            let idx = (self.head + self.len) % N;
            self.data[idx] = item;
            self.len += 1;
            None
        } else {
            let evicted = self.data[self.head];
            let idx = (self.head + self.len) % N;
            self.data[idx] = item;
            self.head = (self.head + 1) % N;
            Some(evicted)
        }
    }

    /// Get number of stored items
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the window is full
    pub fn is_full(&self) -> bool {
        self.len == self.window
    }

    /// Maximum number of items retained
    pub fn window(&self) -> usize {
        self.window
    }

    /// Get the most recent item
    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.get(self.len - 1)
    }

    /// Gets an item by logical index (0 = oldest, len-1 = newest)
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        Some(&self.data[(self.head + index) % N])
    }

    /// Iterate over items from oldest to newest
    pub fn iter(&self) -> CircularBufferIter<'_, T, N> {
        CircularBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Clear all items, keeping the window
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

impl<const N: usize> CircularBuffer<f32, N> {
    /// Arithmetic mean of the held items, `None` when empty
    pub fn mean(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let sum: f32 = self.iter().sum();
        Some(sum / self.len as f32)
    }

    /// Smallest and largest held item
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.iter();
        let first = *iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
    }
}

/// Iterator over circular buffer contents, oldest first
pub struct CircularBufferIter<'a, T: Copy + Default, const N: usize> {
    buffer: &'a CircularBuffer<T, N>,
    index: usize,
}

impl<'a, T: Copy + Default, const N: usize> Iterator for CircularBufferIter<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}

impl<T: Copy + Default, const N: usize> Default for CircularBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
