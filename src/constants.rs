//! Fixed byte tables and offsets for the save container and the song image codec.
//!
//! Values here are bit-exact, compatibility-critical constants pulled directly from the
//! format: marker bytes, default-constant tables, and the bank offset table that the
//! song-image parser/writer treat as the single source of truth for every field's
//! position. See `DESIGN.md` for how a handful of "reserved" field widths were derived to
//! make the bank tables land exactly on the fixed anchors (the `"rb"` markers and the
//! version byte).

// ---- block-packed save container ----------------------------------------------------

/// Bytes in one compressed block.
pub const BLOCK_SIZE: usize = 0x200;

/// Number of usable data blocks in the save region.
pub const BLOCK_COUNT: usize = 191;

/// Total size of a save file.
pub const SAVE_LEN: usize = 0x20000;

/// Size of the uncompressed working song image at the front of the save.
pub const SONG_IMAGE_LEN: usize = 0x8000;

/// Offset of the header, directly after the working song image.
pub const HEADER_OFFSET: usize = SONG_IMAGE_LEN;

/// Size of the header (project names, versions, padding, init marker, active project).
pub const HEADER_LEN: usize = 0x141;

/// Offset of the per-block owner table.
pub const OWNER_TABLE_OFFSET: usize = HEADER_OFFSET + HEADER_LEN;

/// Size of the per-block owner table (one byte per data block).
pub const OWNER_TABLE_LEN: usize = BLOCK_COUNT;

/// Offset of the first data block (anchor for in-band block-jump arithmetic).
pub const BLOCKS_OFFSET: usize = OWNER_TABLE_OFFSET + OWNER_TABLE_LEN;

/// Maximum number of named project slots in a save.
pub const PROJECT_COUNT: usize = 32;

/// Fixed width of a project name.
pub const PROJECT_NAME_LEN: usize = 8;

/// Byte value marking a block as unowned in the owner table.
pub const FREE_BLOCK: u8 = 0xFF;

/// The two-byte save initialization marker, ASCII `j`, `k`.
pub const INIT_MARKER: [u8; 2] = [b'j', b'k'];

/// No active project.
pub const NO_ACTIVE_PROJECT: u8 = 0xFF;

// ---- header internal layout (relative to HEADER_OFFSET) ------------------------------
//
// Order per the format's prose: project names, versions, padding, init marker,
// active-project. The padding length (and so every offset after it) is pinned by the
// known init-marker offset `0x8000 + 0x13E`, which is load-bearing.

pub const HEADER_NAMES_OFFSET: usize = 0;
pub const HEADER_NAMES_LEN: usize = PROJECT_COUNT * PROJECT_NAME_LEN;

pub const HEADER_VERSIONS_OFFSET: usize = HEADER_NAMES_OFFSET + HEADER_NAMES_LEN;
pub const HEADER_VERSIONS_LEN: usize = PROJECT_COUNT;

pub const HEADER_PADDING_OFFSET: usize = HEADER_VERSIONS_OFFSET + HEADER_VERSIONS_LEN;

/// Load-bearing: a corrupted byte here is the documented "bad init" failure case.
pub const HEADER_INIT_OFFSET: usize = 0x13E;
pub const HEADER_PADDING_LEN: usize = HEADER_INIT_OFFSET - HEADER_PADDING_OFFSET;
pub const HEADER_INIT_LEN: usize = 2;

pub const HEADER_ACTIVE_OFFSET: usize = HEADER_INIT_OFFSET + HEADER_INIT_LEN;
pub const HEADER_ACTIVE_LEN: usize = 1;

// ---- stream codec ---------------------------------------------------------------------

/// Run-length marker byte.
pub const RLE_BYTE: u8 = 0xC0;

/// Special-action marker byte.
pub const CMD_BYTE: u8 = 0xE0;

/// Sub-action: emit `count` copies of the default wave.
pub const DEFAULT_WAVE_BYTE: u8 = 0xF0;

/// Sub-action: emit `count` copies of the default instrument.
pub const DEFAULT_INSTRUMENT_BYTE: u8 = 0xF1;

/// Sub-action: end of stream.
pub const EOF_BYTE: u8 = 0xFF;

/// Maximum run length encodable in a single RLE/default-constant event.
pub const MAX_RUN: usize = 255;

/// Highest byte value that is a valid 1-based block-jump target (blocks are 1..=0xBF).
pub const MAX_JUMP_BYTE: u8 = 0xBF;

/// The 16-byte default wave constant, frequent enough in song images to warrant its own
/// compression marker.
pub const DEFAULT_WAVE: [u8; 16] = [
    0x8E, 0xCD, 0xCC, 0xBB, 0xAA, 0xA9, 0x99, 0x88, 0x87, 0x76, 0x66, 0x55, 0x54, 0x43, 0x32, 0x31,
];

/// The 16-byte default instrument constant.
pub const DEFAULT_INSTRUMENT: [u8; 16] = [
    0xA8, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x03, 0x00, 0x00, 0xD0, 0x00, 0x00, 0x00, 0xF3, 0x00, 0x00,
];

// ---- song image: global anchors --------------------------------------------------------

/// The `"rb"` verification marker, ASCII `r`, `b`.
pub const RB_MARKER: [u8; 2] = [0x72, 0x62];

/// Offset of the format version byte (last byte of the image).
pub const VERSION_OFFSET: usize = 0x7FFF;

/// First format version that uses the shifted table-command encoding.
pub const SHIFTED_COMMAND_VERSION: u8 = 8;

/// Logical ordinal of the table command `B`, introduced at [`SHIFTED_COMMAND_VERSION`].
pub const COMMAND_B_ORDINAL: u8 = 1;

// ---- song image: bank 0 (0x0000-0x1FFF) -------------------------------------------------

pub const PHRASE_NOTES_OFFSET: usize = 0x0000;
pub const PHRASE_COUNT: usize = 256;
pub const PHRASE_NOTES_LEN: usize = PHRASE_COUNT * 16;

pub const BOOKMARKS_OFFSET: usize = 0x1000;
pub const BOOKMARKS_LEN: usize = 64;

pub const RESERVED_1040_OFFSET: usize = 0x1040;
pub const RESERVED_1040_LEN: usize = 240;

pub const GROOVES_OFFSET: usize = 0x1130;
pub const GROOVE_COUNT: usize = 32;
pub const GROOVES_LEN: usize = GROOVE_COUNT * 16;

pub const ROWS_OFFSET: usize = 0x1330;
pub const ROW_COUNT: usize = 256;
pub const CHANNELS_PER_ROW: usize = 6;
pub const ROWS_LEN: usize = ROW_COUNT * CHANNELS_PER_ROW;

pub const TABLE_ENVELOPES_OFFSET: usize = 0x1930;
pub const TABLE_COUNT: usize = 32;
pub const TABLE_ENVELOPES_LEN: usize = TABLE_COUNT * 16;

pub const WORD_ALLOPHONES_OFFSET: usize = 0x1B30;
pub const WORD_COUNT: usize = 42;
pub const WORD_ALLOPHONES_LEN: usize = WORD_COUNT * 16;

pub const WORD_NAMES_OFFSET: usize = 0x1DD0;
pub const WORD_NAME_LEN: usize = 4;
pub const WORD_NAMES_LEN: usize = WORD_COUNT * WORD_NAME_LEN;

pub const RB_MARKER_1_OFFSET: usize = 0x1E78;

pub const INSTRUMENT_NAMES_OFFSET: usize = 0x1E7A;
pub const INSTRUMENT_COUNT: usize = 64;
pub const INSTRUMENT_NAME_LEN: usize = 5;
pub const INSTRUMENT_NAMES_LEN: usize = INSTRUMENT_COUNT * INSTRUMENT_NAME_LEN;

pub const RESERVED_1FBA_OFFSET: usize = 0x1FBA;
pub const RESERVED_1FBA_LEN: usize = 70;

pub const BANK_1_OFFSET: usize = 0x2000;

// ---- song image: bank 1 (0x2000-0x3FFF) -------------------------------------------------

pub const RESERVED_2000_OFFSET: usize = 0x2000;
pub const RESERVED_2000_LEN: usize = 32;

pub const TABLE_ALLOC_OFFSET: usize = 0x2020;
pub const TABLE_ALLOC_LEN: usize = TABLE_COUNT;

pub const INSTRUMENT_ALLOC_OFFSET: usize = 0x2040;
pub const INSTRUMENT_ALLOC_LEN: usize = INSTRUMENT_COUNT;

pub const CHAIN_PHRASES_OFFSET: usize = 0x2080;
pub const CHAIN_COUNT: usize = 128;
pub const CHAIN_PHRASES_LEN: usize = CHAIN_COUNT * 16;

pub const CHAIN_TRANSPOSITIONS_OFFSET: usize = 0x2880;
pub const CHAIN_TRANSPOSITIONS_LEN: usize = CHAIN_COUNT * 16;

pub const INSTRUMENT_PAYLOADS_OFFSET: usize = 0x3080;
pub const INSTRUMENT_PAYLOADS_LEN: usize = INSTRUMENT_COUNT * 16;

pub const TABLE_TRANSPOSITIONS_OFFSET: usize = 0x3480;
pub const TABLE_TRANSPOSITIONS_LEN: usize = TABLE_COUNT * 16;

pub const TABLE_CMD1_COMMANDS_OFFSET: usize = 0x3680;
pub const TABLE_CMD1_COMMANDS_LEN: usize = TABLE_COUNT * 16;

pub const TABLE_CMD1_VALUES_OFFSET: usize = 0x3880;
pub const TABLE_CMD1_VALUES_LEN: usize = TABLE_COUNT * 16;

pub const TABLE_CMD2_COMMANDS_OFFSET: usize = 0x3A80;
pub const TABLE_CMD2_COMMANDS_LEN: usize = TABLE_COUNT * 16;

pub const TABLE_CMD2_VALUES_OFFSET: usize = 0x3C80;
pub const TABLE_CMD2_VALUES_LEN: usize = TABLE_COUNT * 16;

pub const RB_MARKER_2_OFFSET: usize = 0x3E80;

pub const PHRASE_ALLOC_BITMAP_OFFSET: usize = 0x3E82;
pub const PHRASE_ALLOC_BITMAP_LEN: usize = PHRASE_COUNT / 8;

pub const CHAIN_ALLOC_BITMAP_OFFSET: usize = 0x3EA2;
pub const CHAIN_ALLOC_BITMAP_LEN: usize = CHAIN_COUNT / 8;

pub const SYNTHS_OFFSET: usize = 0x3EB2;
pub const SYNTH_COUNT: usize = 16;
pub const SYNTH_RECORD_LEN: usize = 17;
pub const SYNTHS_LEN: usize = SYNTH_COUNT * SYNTH_RECORD_LEN;

pub const META_OFFSET: usize = 0x3FC2;
pub const META_LEN: usize = 17;

pub const WAVE_SYNTH_LOCK_OFFSET: usize = 0x3FD3;
pub const WAVE_SYNTH_LOCK_LEN: usize = 2;

pub const RESERVED_3FC6_OFFSET: usize = 0x3FD5;
pub const RESERVED_3FC6_LEN: usize = 43;

pub const BANK_2_OFFSET: usize = 0x4000;

// ---- song image: bank 2 (0x4000-0x5FFF) -------------------------------------------------

pub const PHRASE_COMMAND_CODES_OFFSET: usize = 0x4000;
pub const PHRASE_COMMAND_CODES_LEN: usize = PHRASE_COUNT * 16;

pub const PHRASE_COMMAND_VALUES_OFFSET: usize = 0x5000;
pub const PHRASE_COMMAND_VALUES_LEN: usize = PHRASE_COUNT * 16;

pub const BANK_3_OFFSET: usize = 0x6000;

// ---- song image: bank 3 (0x6000-0x7FFF) -------------------------------------------------

pub const WAVES_OFFSET: usize = 0x6000;
pub const WAVE_COUNT: usize = 16;
pub const WAVES_LEN: usize = WAVE_COUNT * 16;

pub const PHRASE_INSTRUMENTS_OFFSET: usize = 0x6100;
pub const PHRASE_INSTRUMENTS_LEN: usize = PHRASE_COUNT * 16;

pub const RESERVED_6100_OFFSET: usize = 0x7100;
pub const RESERVED_6100_LEN: usize = 3824;

pub const RB_MARKER_3_OFFSET: usize = 0x7FF0;

pub const RESERVED_7FF2_OFFSET: usize = 0x7FF2;
pub const RESERVED_7FF2_LEN: usize = 13;
