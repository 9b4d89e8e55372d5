//! Instruments: 16-byte payloads interpreted by type (pulse/wave/kit/noise).
use crate::constants::{DEFAULT_INSTRUMENT, INSTRUMENT_COUNT};
use crate::name::Name;

/// The instrument's sound-engine type, read from the payload's first byte. Unrecognized
/// values are preserved verbatim rather than rejected, since this library does not
/// validate musical semantics beyond format integrity.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum InstrumentKind {
    Pulse,
    Wave,
    Kit,
    Noise,
    Unknown(u8),
}

impl InstrumentKind {
    fn from_byte(b: u8) -> Self {
        match b {
            0 => InstrumentKind::Pulse,
            1 => InstrumentKind::Wave,
            2 => InstrumentKind::Kit,
            3 => InstrumentKind::Noise,
            other => InstrumentKind::Unknown(other),
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            InstrumentKind::Pulse => 0,
            InstrumentKind::Wave => 1,
            InstrumentKind::Kit => 2,
            InstrumentKind::Noise => 3,
            InstrumentKind::Unknown(b) => b,
        }
    }
}

/// One instrument: a 16-byte payload whose first byte selects [`InstrumentKind`]; the
/// remaining 15 bytes are engine-specific parameters this library does not interpret
/// further (out of scope: "no validation of musical semantics beyond format integrity").
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Instrument {
    bytes: [u8; 16],
}

impl Instrument {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    /// The canonical "absent instrument" payload, used to fill unallocated slots on write.
    pub fn default_payload() -> Self {
        Self {
            bytes: DEFAULT_INSTRUMENT,
        }
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    pub fn kind(&self) -> InstrumentKind {
        InstrumentKind::from_byte(self.bytes[0])
    }

    pub fn set_kind(&mut self, kind: InstrumentKind) {
        self.bytes[0] = kind.to_byte();
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Self::default_payload()
    }
}

/// The dense array of all 64 possible instruments, their names, and the presence table.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct InstrumentTable {
    pub entries: [Instrument; INSTRUMENT_COUNT],
    pub names: [Name<5>; INSTRUMENT_COUNT],
}

impl InstrumentTable {
    pub fn new() -> Self {
        Self {
            entries: [Instrument::default_payload(); INSTRUMENT_COUNT],
            names: [Name::empty(); INSTRUMENT_COUNT],
        }
    }
}

impl Default for InstrumentTable {
    fn default() -> Self {
        Self::new()
    }
}
