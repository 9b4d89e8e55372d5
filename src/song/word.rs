//! Speech words: 42 fixed slots, each 8 allophones + 8 lengths, plus a 4-byte name per
//! word. Unconditional — no presence bitmap.
use crate::constants::WORD_COUNT;
use crate::name::Name;

/// One speech word: 8 allophone codes and their 8 matching lengths.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Word {
    pub allophones: [u8; 8],
    pub lengths: [u8; 8],
}

impl Word {
    pub fn empty() -> Self {
        Self {
            allophones: [0; 8],
            lengths: [0; 8],
        }
    }
}

impl Default for Word {
    fn default() -> Self {
        Self::empty()
    }
}

/// The dense array of all 42 speech words and their names.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct WordTable {
    pub entries: [Word; WORD_COUNT],
    pub names: [Name<4>; WORD_COUNT],
}

impl WordTable {
    pub fn new() -> Self {
        Self {
            entries: [Word::empty(); WORD_COUNT],
            names: [Name::empty(); WORD_COUNT],
        }
    }
}

impl Default for WordTable {
    fn default() -> Self {
        Self::new()
    }
}
