//! Rows: the 256-entry song sequence, each holding a chain reference per channel.
use crate::constants::{CHANNELS_PER_ROW, ROW_COUNT};

/// One row of the song sequence: a chain index per channel, or `0xFF` for silence.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Row {
    pub channels: [u8; CHANNELS_PER_ROW],
}

impl Row {
    pub fn empty() -> Self {
        Self {
            channels: [0xFF; CHANNELS_PER_ROW],
        }
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::empty()
    }
}

/// The song sequence: all 256 rows.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct RowTable {
    pub entries: [Row; ROW_COUNT],
}

impl RowTable {
    pub fn new() -> Self {
        Self {
            entries: [Row::empty(); ROW_COUNT],
        }
    }
}

impl Default for RowTable {
    fn default() -> Self {
        Self::new()
    }
}
