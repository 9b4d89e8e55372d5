//! Soft-synth parameter records: 16 fixed slots, 14 parameter bytes plus 3 reserved bytes
//! each. Unconditional — no presence bitmap exists for synths.
use crate::constants::SYNTH_COUNT;

/// One soft-synth parameter record.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct SynthParams {
    pub params: [u8; 14],
    /// Opaque, round-tripped byte-for-byte; never interpreted.
    pub reserved: [u8; 3],
}

impl SynthParams {
    pub fn empty() -> Self {
        Self {
            params: [0; 14],
            reserved: [0; 3],
        }
    }
}

impl Default for SynthParams {
    fn default() -> Self {
        Self::empty()
    }
}

/// The dense array of all 16 soft-synth parameter records.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct SynthTable {
    pub entries: [SynthParams; SYNTH_COUNT],
}

impl SynthTable {
    pub fn new() -> Self {
        Self {
            entries: [SynthParams::empty(); SYNTH_COUNT],
        }
    }
}

impl Default for SynthTable {
    fn default() -> Self {
        Self::new()
    }
}
