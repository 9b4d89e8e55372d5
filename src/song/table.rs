//! Tables: 16 envelopes, 16 transpositions, and two command slots (command + value) per
//! step, each 16 entries wide.
use crate::constants::{COMMAND_B_ORDINAL, SHIFTED_COMMAND_VERSION, TABLE_COUNT};
use crate::error::LibResult;

/// One table: envelope/transposition/command data addressed by a 16-step index.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Table {
    pub envelopes: [u8; 16],
    pub transpositions: [u8; 16],
    /// Logical command ordinals for the first command slot (already version-decoded).
    pub command1: [u8; 16],
    pub value1: [u8; 16],
    /// Logical command ordinals for the second command slot.
    pub command2: [u8; 16],
    pub value2: [u8; 16],
}

impl Table {
    pub fn empty() -> Self {
        Self {
            envelopes: [0; 16],
            transpositions: [0; 16],
            command1: [0; 16],
            value1: [0; 16],
            command2: [0; 16],
            value2: [0; 16],
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::empty()
    }
}

/// The dense array of all 32 possible tables, alongside the presence table.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct TableTable {
    pub entries: [Table; TABLE_COUNT],
}

impl TableTable {
    pub fn new() -> Self {
        Self {
            entries: [Table::empty(); TABLE_COUNT],
        }
    }
}

impl Default for TableTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a stored table-command byte into its logical ordinal, given the song's format
/// version. Versions `>= 8` use the shifted encoding (see [`encode_table_command`]);
/// older versions store ordinals verbatim.
pub fn decode_table_command(stored: u8, version: u8) -> u8 {
    if version >= SHIFTED_COMMAND_VERSION {
        if stored <= 1 {
            stored
        } else {
            stored - 1
        }
    } else {
        stored
    }
}

/// Encode a logical command ordinal into its stored byte, given the song's format
/// version. Fails with a format error if the caller asks to write command `B` on a
/// version older than [`SHIFTED_COMMAND_VERSION`], which cannot represent it.
pub fn encode_table_command(ordinal: u8, version: u8) -> LibResult<u8> {
    if version >= SHIFTED_COMMAND_VERSION {
        if ordinal <= 1 {
            Ok(ordinal)
        } else {
            Ok(ordinal + 1)
        }
    } else if ordinal == COMMAND_B_ORDINAL {
        fmt_err!(
            "command B requires format version >= {}, got {}",
            SHIFTED_COMMAND_VERSION,
            version
        )
    } else {
        Ok(ordinal)
    }
}
