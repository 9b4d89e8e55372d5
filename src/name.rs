//! A fixed-width, space-or-zero-padded name, used for project names and instrument/word
//! names. Modeled on the small typed wrapper structs the teacher uses for other
//! fixed-shape byte fields (e.g. `Division`), generalized to a const-generic width since
//! this format reuses the same shape at several different widths (8, 5, 4).
use std::fmt;

/// A name of exactly `N` bytes, as stored on disk: ASCII, space- or zero-padded, not
/// necessarily null-terminated.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Name<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> Name<N> {
    /// An all-zero name (the canonical "empty" value).
    pub fn empty() -> Self {
        Self { bytes: [0u8; N] }
    }

    /// Wrap a raw `N`-byte array as-is, with no validation beyond length (enforced by the
    /// type itself). Bytes need not be ASCII; the format does not guarantee it.
    pub fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    /// Build a name from a string, truncating or space-padding to `N` bytes.
    pub fn from_str_lossy(s: &str) -> Self {
        let mut bytes = [0u8; N];
        for (i, b) in s.as_bytes().iter().take(N).enumerate() {
            bytes[i] = *b;
        }
        Self { bytes }
    }

    /// The raw, padded bytes as stored on disk.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// `true` if every byte is zero.
    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// Render as a string, stopping at the first NUL byte and trimming trailing spaces.
    /// Lossy: non-UTF8 bytes are replaced per `String::from_utf8_lossy`.
    pub fn display(&self) -> String {
        let end = self.bytes.iter().position(|b| *b == 0).unwrap_or(N);
        String::from_utf8_lossy(&self.bytes[..end])
            .trim_end()
            .to_string()
    }
}

impl<const N: usize> Default for Name<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> fmt::Debug for Name<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.display())
    }
}
