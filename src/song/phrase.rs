//! Phrases: 16 notes, 16 instrument references, and 16 command (code, value) pairs.
use crate::constants::PHRASE_COUNT;

/// One phrase: 16 rows of note / instrument / command data.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Phrase {
    /// Note value per row (tracker-specific encoding; `0xFF`/not-set is left opaque here).
    pub notes: [u8; 16],
    /// Instrument index per row, or `0xFF` for none.
    pub instruments: [u8; 16],
    /// Command code per row.
    pub command_codes: [u8; 16],
    /// Command value per row.
    pub command_values: [u8; 16],
}

impl Phrase {
    /// An empty phrase, as written for an absent phrase slot.
    pub fn empty() -> Self {
        Self {
            notes: [0; 16],
            instruments: [0xFF; 16],
            command_codes: [0; 16],
            command_values: [0; 16],
        }
    }
}

impl Default for Phrase {
    fn default() -> Self {
        Self::empty()
    }
}

/// The dense array of all 256 possible phrases, alongside the packed presence bitmap.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct PhraseTable {
    pub entries: [Phrase; PHRASE_COUNT],
}

impl PhraseTable {
    pub fn new() -> Self {
        Self {
            entries: [Phrase::empty(); PHRASE_COUNT],
        }
    }
}

impl Default for PhraseTable {
    fn default() -> Self {
        Self::new()
    }
}
