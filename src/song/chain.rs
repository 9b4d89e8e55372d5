//! Chains: 16 phrase references plus 16 per-step transpositions.
use crate::constants::CHAIN_COUNT;

/// One chain: a 16-step sequence of phrase indices and per-step transpositions.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Chain {
    /// Phrase index per step, or `0xFF` for an empty step.
    pub phrases: [u8; 16],
    /// Signed semitone transposition applied to the referenced phrase's notes.
    pub transpositions: [i8; 16],
}

impl Chain {
    /// A chain with all steps empty (`0xFF` phrase refs, zero transposition), as written
    /// for an absent chain slot.
    pub fn empty() -> Self {
        Self {
            phrases: [0xFF; 16],
            transpositions: [0; 16],
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::empty()
    }
}

/// The dense array of all 128 possible chains, alongside the packed presence bitmap that
/// says which indices actually exist.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct ChainTable {
    pub entries: [Chain; CHAIN_COUNT],
}

impl ChainTable {
    pub fn new() -> Self {
        Self {
            entries: [Chain::empty(); CHAIN_COUNT],
        }
    }
}

impl Default for ChainTable {
    fn default() -> Self {
        Self::new()
    }
}
