//! Frame Assembly
//!
//! A [`Frame`] is the complete snapshot emitted once per master tick: one
//! entry for every configured channel, in configuration order, whether or
//! not the channel has ever produced a value.
//!
//! ```text
//! Frame #42 @ 4200 ms
//! ├── ecg               value
//! ├── gsr               value
//! ├── muscle            value
//! ├── environment       value
//! ├── body_temperature  value  fresh=false
//! ├── pulse             value  fresh=true
//! └── ppg_ir            latest raw IR
//! ```
//!
//! [`assemble`] is a pure function of channel state; it keeps no memory of
//! earlier frames.

use heapless::Vec;

use crate::{
    channels::{ChannelKind, ChannelState, ChannelValue},
    constants::buffers::MAX_CHANNELS,
    time::Timestamp,
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// One channel's slot in a frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FrameEntry {
    /// Channel of this entry
    pub kind: ChannelKind,
    /// Held or fresh value; `None` is the "no data yet" sentinel
    pub value: Option<ChannelValue>,
    /// Freshness flag, only for channels that track it
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub fresh: Option<bool>,
}

impl FrameEntry {
    /// Build the entry for one channel
    pub fn from_state(state: &ChannelState) -> Self {
        Self {
            kind: state.kind,
            value: state.reported_value(),
            fresh: state.tracks_freshness.then_some(state.is_fresh),
        }
    }
}

/// Immutable per-tick snapshot of all channels
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Frame {
    /// Ticks since start, starting at 0
    pub sequence: u64,
    /// Time passed to the tick
    pub timestamp: Timestamp,
    /// One entry per configured channel
    pub entries: Vec<FrameEntry, MAX_CHANNELS>,
    /// Latest raw IR intensity drained from the PPG sensor
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub ppg_ir: Option<u32>,
}

impl Frame {
    /// Entry of one channel
    pub fn get(&self, kind: ChannelKind) -> Option<&FrameEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Value of one channel, `None` if absent or not configured
    pub fn value(&self, kind: ChannelKind) -> Option<ChannelValue> {
        self.get(kind).and_then(|e| e.value)
    }

    /// Published heart rate, if any
    pub fn heart_rate(&self) -> Option<u16> {
        match self.value(ChannelKind::Pulse) {
            Some(ChannelValue::Pulse(reading)) => reading.bpm,
            _ => None,
        }
    }

    /// Kinds in frame order
    pub fn kinds(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        self.entries.iter().map(|e| e.kind)
    }

    /// Number of channel entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the frame has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merge channel states into a frame
///
/// At most [`MAX_CHANNELS`] states are taken; configuration validation
/// guarantees the table never holds more.
pub fn assemble<'a, I>(sequence: u64, timestamp: Timestamp, states: I, ppg_ir: Option<u32>) -> Frame
where
    I: IntoIterator<Item = &'a ChannelState>,
{
    let mut entries = Vec::new();
    for state in states.into_iter().take(MAX_CHANNELS) {
        // Capacity checked by take()
        let _ = entries.push(FrameEntry::from_state(state));
    }

    Frame {
        sequence,
        timestamp,
        entries,
        ppg_ir,
    }
}
