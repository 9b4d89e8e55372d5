//! Bookmarks: a fixed 64-byte region. The distilled format gives no further structure for
//! this field, so it is preserved as an opaque byte array, round-tripped byte-for-byte
//! (see `DESIGN.md`'s note on reserved/opaque regions).
use crate::constants::BOOKMARKS_LEN;

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Bookmarks {
    bytes: [u8; BOOKMARKS_LEN],
}

impl Bookmarks {
    pub fn empty() -> Self {
        Self {
            bytes: [0; BOOKMARKS_LEN],
        }
    }

    pub fn from_bytes(bytes: [u8; BOOKMARKS_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; BOOKMARKS_LEN] {
        &self.bytes
    }
}

impl Default for Bookmarks {
    fn default() -> Self {
        Self::empty()
    }
}
