//! Wave frames: 16 fixed slots of 16 bytes each. Unconditional — no presence bitmap.
use crate::constants::WAVE_COUNT;

/// One 16-byte wave frame.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Wave {
    pub samples: [u8; 16],
}

impl Wave {
    pub fn empty() -> Self {
        Self { samples: [0; 16] }
    }
}

impl Default for Wave {
    fn default() -> Self {
        Self::empty()
    }
}

/// The dense array of all 16 wave frames.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct WaveTable {
    pub entries: [Wave; WAVE_COUNT],
}

impl WaveTable {
    pub fn new() -> Self {
        Self {
            entries: [Wave::empty(); WAVE_COUNT],
        }
    }
}

impl Default for WaveTable {
    fn default() -> Self {
        Self::new()
    }
}
