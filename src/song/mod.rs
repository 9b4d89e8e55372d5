//! The 32 KiB decompressed song image: a bank-structured binary layout whose four 8 KiB
//! banks are a pure naming convenience over a single flat offset table (`constants.rs`).
//! [`read_song_image`]/[`write_song_image`] are exact mirrors of each other, as the
//! distilled format requires.
pub mod alloc;
pub mod bookmark;
pub mod chain;
pub mod groove;
pub mod instrument;
pub mod meta;
pub mod phrase;
pub mod row;
pub mod synth;
pub mod table;
pub mod wave;
pub mod word;

use crate::byte_stream::{ByteStream, ByteStreamExt};
use crate::constants::*;
use crate::error::LibResult;
use crate::name::Name;
use alloc::{AllocBitmap, AllocTable};
use bookmark::Bookmarks;
use chain::{Chain, ChainTable};
use groove::GrooveTable;
use instrument::{Instrument, InstrumentTable};
use log::debug;
use meta::{Meta, WaveSynthLock};
use phrase::{Phrase, PhraseTable};
use row::{Row, RowTable};
use snafu::ensure;
use synth::SynthTable;
use table::{Table, TableTable};
use wave::WaveTable;
use word::WordTable;

/// Opaque, byte-for-byte-preserved regions this library does not interpret. Their
/// *lengths* were derived (see `DESIGN.md`) to make the surrounding structurally-forced
/// fields land exactly on the format's fixed anchors; their *content* is never
/// synthesized or inspected.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ReservedRegions {
    pub reserved_1040: [u8; RESERVED_1040_LEN],
    pub reserved_1fba: [u8; RESERVED_1FBA_LEN],
    pub reserved_2000: [u8; RESERVED_2000_LEN],
    pub reserved_3fc6: [u8; RESERVED_3FC6_LEN],
    pub reserved_6100: [u8; RESERVED_6100_LEN],
    pub reserved_7ff2: [u8; RESERVED_7FF2_LEN],
}

impl ReservedRegions {
    fn zeroed() -> Self {
        Self {
            reserved_1040: [0; RESERVED_1040_LEN],
            reserved_1fba: [0; RESERVED_1FBA_LEN],
            reserved_2000: [0; RESERVED_2000_LEN],
            reserved_3fc6: [0; RESERVED_3FC6_LEN],
            reserved_6100: [0; RESERVED_6100_LEN],
            reserved_7ff2: [0; RESERVED_7FF2_LEN],
        }
    }
}

/// The decompressed 32 KiB song image.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct SongImage {
    pub version: u8,
    pub rows: RowTable,
    pub chains: ChainTable,
    pub chain_alloc: AllocBitmap<CHAIN_COUNT>,
    pub phrases: PhraseTable,
    pub phrase_alloc: AllocBitmap<PHRASE_COUNT>,
    pub instruments: InstrumentTable,
    pub instrument_alloc: AllocTable<INSTRUMENT_COUNT>,
    pub tables: TableTable,
    pub table_alloc: AllocTable<TABLE_COUNT>,
    pub synths: SynthTable,
    pub waves: WaveTable,
    pub grooves: GrooveTable,
    pub words: WordTable,
    pub bookmarks: Bookmarks,
    pub meta: Meta,
    pub wave_synth_lock: WaveSynthLock,
    pub reserved: ReservedRegions,
}

impl SongImage {
    /// Construct a freshly initialized, valid song image: all three `"rb"` markers
    /// present, version set, every allocation table cleared to "absent", and every
    /// conditional array already holding the canonical fill bytes for its absent state.
    /// This can be fed directly to [`crate::codec::compress`] with no prior read
    /// round-trip.
    pub fn new(version: u8) -> Self {
        Self {
            version,
            rows: RowTable::new(),
            chains: ChainTable::new(),
            chain_alloc: AllocBitmap::new(),
            phrases: PhraseTable::new(),
            phrase_alloc: AllocBitmap::new(),
            instruments: InstrumentTable::new(),
            instrument_alloc: AllocTable::new(),
            tables: TableTable::new(),
            table_alloc: AllocTable::new(),
            synths: SynthTable::new(),
            waves: WaveTable::new(),
            grooves: GrooveTable::new(),
            words: WordTable::new(),
            bookmarks: Bookmarks::empty(),
            meta: Meta::default(),
            wave_synth_lock: WaveSynthLock::empty(),
            reserved: ReservedRegions::zeroed(),
        }
    }
}

impl Default for SongImage {
    fn default() -> Self {
        Self::new(0)
    }
}

// ---- small buffer helpers ---------------------------------------------------------------

fn get_array<const N: usize>(buf: &[u8], offset: usize) -> [u8; N] {
    buf[offset..offset + N].try_into().unwrap()
}

fn put_array<const N: usize>(buf: &mut [u8], offset: usize, value: &[u8; N]) {
    buf[offset..offset + N].copy_from_slice(value);
}

/// Read `count` contiguous 16-byte entries starting at `offset`.
fn read_16_arrays(buf: &[u8], offset: usize, count: usize) -> Vec<[u8; 16]> {
    buf[offset..offset + count * 16]
        .chunks_exact(16)
        .map(|c| c.try_into().unwrap())
        .collect()
}

fn write_16_arrays(buf: &mut [u8], offset: usize, arrays: impl Iterator<Item = [u8; 16]>) {
    for (i, arr) in arrays.enumerate() {
        put_array::<16>(buf, offset + i * 16, &arr);
    }
}

fn check_rb_marker(buf: &[u8], offset: usize) -> LibResult<()> {
    let found = &buf[offset..offset + 2];
    ensure!(
        found == RB_MARKER,
        crate::error::Format {
            site: site!(),
            description: format!("missing rb marker at {:#06x}", offset),
        }
    );
    Ok(())
}

/// Parse a 32 KiB song image from an in-memory buffer.
pub(crate) fn parse_buffer(buf: &[u8]) -> LibResult<SongImage> {
    debug_assert_eq!(buf.len(), SONG_IMAGE_LEN);

    check_rb_marker(buf, RB_MARKER_1_OFFSET)?;
    check_rb_marker(buf, RB_MARKER_2_OFFSET)?;
    check_rb_marker(buf, RB_MARKER_3_OFFSET)?;
    debug!("song image: all three rb markers verified");

    let version = buf[VERSION_OFFSET];

    let table_alloc = AllocTable::<TABLE_COUNT>::from_bytes(
        &buf[TABLE_ALLOC_OFFSET..TABLE_ALLOC_OFFSET + TABLE_ALLOC_LEN],
    );
    let instrument_alloc = AllocTable::<INSTRUMENT_COUNT>::from_bytes(
        &buf[INSTRUMENT_ALLOC_OFFSET..INSTRUMENT_ALLOC_OFFSET + INSTRUMENT_ALLOC_LEN],
    );
    let phrase_alloc = AllocBitmap::<PHRASE_COUNT>::from_bytes(
        &buf[PHRASE_ALLOC_BITMAP_OFFSET..PHRASE_ALLOC_BITMAP_OFFSET + PHRASE_ALLOC_BITMAP_LEN],
    );
    let chain_alloc = AllocBitmap::<CHAIN_COUNT>::from_bytes(
        &buf[CHAIN_ALLOC_BITMAP_OFFSET..CHAIN_ALLOC_BITMAP_OFFSET + CHAIN_ALLOC_BITMAP_LEN],
    );
    debug!(
        "song image: {} tables, {} instruments, {} phrases, {} chains allocated",
        table_alloc.iter_present().count(),
        instrument_alloc.iter_present().count(),
        phrase_alloc.iter_present().count(),
        chain_alloc.iter_present().count()
    );

    // rows
    let mut rows = RowTable::new();
    for i in 0..ROW_COUNT {
        let off = ROWS_OFFSET + i * CHANNELS_PER_ROW;
        rows.entries[i] = Row {
            channels: get_array::<CHANNELS_PER_ROW>(buf, off),
        };
    }

    // chains
    let phrase_refs = read_16_arrays(buf, CHAIN_PHRASES_OFFSET, CHAIN_COUNT);
    let transpositions = read_16_arrays(buf, CHAIN_TRANSPOSITIONS_OFFSET, CHAIN_COUNT);
    let mut chains = ChainTable::new();
    for i in 0..CHAIN_COUNT {
        let mut transposed = [0i8; 16];
        for (j, b) in transpositions[i].iter().enumerate() {
            transposed[j] = *b as i8;
        }
        chains.entries[i] = Chain {
            phrases: phrase_refs[i],
            transpositions: transposed,
        };
    }

    // phrases: notes (bank0), instruments (bank3), command codes/values (bank2)
    let notes = read_16_arrays(buf, PHRASE_NOTES_OFFSET, PHRASE_COUNT);
    let instr_refs = read_16_arrays(buf, PHRASE_INSTRUMENTS_OFFSET, PHRASE_COUNT);
    let cmd_codes = read_16_arrays(buf, PHRASE_COMMAND_CODES_OFFSET, PHRASE_COUNT);
    let cmd_values = read_16_arrays(buf, PHRASE_COMMAND_VALUES_OFFSET, PHRASE_COUNT);
    let mut phrases = PhraseTable::new();
    for i in 0..PHRASE_COUNT {
        phrases.entries[i] = Phrase {
            notes: notes[i],
            instruments: instr_refs[i],
            command_codes: cmd_codes[i],
            command_values: cmd_values[i],
        };
    }

    // instruments
    let mut instruments = InstrumentTable::new();
    for i in 0..INSTRUMENT_COUNT {
        let off = INSTRUMENT_PAYLOADS_OFFSET + i * 16;
        instruments.entries[i] = Instrument::from_bytes(get_array::<16>(buf, off));
        let name_off = INSTRUMENT_NAMES_OFFSET + i * INSTRUMENT_NAME_LEN;
        instruments.names[i] = Name::from_bytes(get_array::<INSTRUMENT_NAME_LEN>(buf, name_off));
    }

    // tables
    let envelopes = read_16_arrays(buf, TABLE_ENVELOPES_OFFSET, TABLE_COUNT);
    let table_transpositions = read_16_arrays(buf, TABLE_TRANSPOSITIONS_OFFSET, TABLE_COUNT);
    let cmd1_commands = read_16_arrays(buf, TABLE_CMD1_COMMANDS_OFFSET, TABLE_COUNT);
    let cmd1_values = read_16_arrays(buf, TABLE_CMD1_VALUES_OFFSET, TABLE_COUNT);
    let cmd2_commands = read_16_arrays(buf, TABLE_CMD2_COMMANDS_OFFSET, TABLE_COUNT);
    let cmd2_values = read_16_arrays(buf, TABLE_CMD2_VALUES_OFFSET, TABLE_COUNT);
    let mut tables = TableTable::new();
    for i in 0..TABLE_COUNT {
        let mut command1 = [0u8; 16];
        let mut command2 = [0u8; 16];
        for j in 0..16 {
            command1[j] = table::decode_table_command(cmd1_commands[i][j], version);
            command2[j] = table::decode_table_command(cmd2_commands[i][j], version);
        }
        tables.entries[i] = Table {
            envelopes: envelopes[i],
            transpositions: table_transpositions[i],
            command1,
            value1: cmd1_values[i],
            command2,
            value2: cmd2_values[i],
        };
    }

    // synths
    let mut synths = SynthTable::new();
    for i in 0..SYNTH_COUNT {
        let off = SYNTHS_OFFSET + i * SYNTH_RECORD_LEN;
        synths.entries[i] = synth::SynthParams {
            params: get_array::<14>(buf, off),
            reserved: get_array::<3>(buf, off + 14),
        };
    }

    // waves
    let mut waves = WaveTable::new();
    for i in 0..WAVE_COUNT {
        waves.entries[i] = wave::Wave {
            samples: get_array::<16>(buf, WAVES_OFFSET + i * 16),
        };
    }

    // grooves
    let mut grooves = GrooveTable::new();
    for i in 0..GROOVE_COUNT {
        grooves.entries[i] = groove::Groove {
            steps: get_array::<16>(buf, GROOVES_OFFSET + i * 16),
        };
    }

    // words
    let mut words = WordTable::new();
    for i in 0..WORD_COUNT {
        let off = WORD_ALLOPHONES_OFFSET + i * 16;
        words.entries[i] = word::Word {
            allophones: get_array::<8>(buf, off),
            lengths: get_array::<8>(buf, off + 8),
        };
        let name_off = WORD_NAMES_OFFSET + i * WORD_NAME_LEN;
        words.names[i] = Name::from_bytes(get_array::<WORD_NAME_LEN>(buf, name_off));
    }

    let bookmarks = Bookmarks::from_bytes(get_array::<BOOKMARKS_LEN>(buf, BOOKMARKS_OFFSET));

    let meta_bytes = &buf[META_OFFSET..META_OFFSET + META_LEN];
    let meta = Meta {
        work_time: u16::from_le_bytes([meta_bytes[0], meta_bytes[1]]),
        tempo: meta_bytes[2],
        transposition: meta_bytes[3],
        total_time: u16::from_le_bytes([meta_bytes[4], meta_bytes[5]]),
        reserved_checksum: meta_bytes[6],
        key_delay: meta_bytes[7],
        key_repeat: meta_bytes[8],
        font: meta_bytes[9],
        sync: meta_bytes[10],
        color_set: meta_bytes[11],
        reserved: meta_bytes[12],
        clone: meta_bytes[13],
        changed: meta_bytes[14],
        power_save: meta_bytes[15],
        pre_listen: meta_bytes[16],
    };

    let wave_synth_lock =
        WaveSynthLock::from_bytes(get_array::<WAVE_SYNTH_LOCK_LEN>(buf, WAVE_SYNTH_LOCK_OFFSET));

    let reserved = ReservedRegions {
        reserved_1040: get_array::<RESERVED_1040_LEN>(buf, RESERVED_1040_OFFSET),
        reserved_1fba: get_array::<RESERVED_1FBA_LEN>(buf, RESERVED_1FBA_OFFSET),
        reserved_2000: get_array::<RESERVED_2000_LEN>(buf, RESERVED_2000_OFFSET),
        reserved_3fc6: get_array::<RESERVED_3FC6_LEN>(buf, RESERVED_3FC6_OFFSET),
        reserved_6100: get_array::<RESERVED_6100_LEN>(buf, RESERVED_6100_OFFSET),
        reserved_7ff2: get_array::<RESERVED_7FF2_LEN>(buf, RESERVED_7FF2_OFFSET),
    };

    Ok(SongImage {
        version,
        rows,
        chains,
        chain_alloc,
        phrases,
        phrase_alloc,
        instruments,
        instrument_alloc,
        tables,
        table_alloc,
        synths,
        waves,
        grooves,
        words,
        bookmarks,
        meta,
        wave_synth_lock,
        reserved,
    })
}

/// Serialize a [`SongImage`] into a fresh 32 KiB buffer, applying the documented
/// fill-byte conventions for every index its presence table marks absent.
pub(crate) fn write_buffer(song: &SongImage) -> LibResult<Vec<u8>> {
    let mut buf = vec![0u8; SONG_IMAGE_LEN];

    buf[VERSION_OFFSET] = song.version;
    put_array(&mut buf, RB_MARKER_1_OFFSET, &RB_MARKER);
    put_array(&mut buf, RB_MARKER_2_OFFSET, &RB_MARKER);
    put_array(&mut buf, RB_MARKER_3_OFFSET, &RB_MARKER);

    put_array(
        &mut buf,
        TABLE_ALLOC_OFFSET,
        &<[u8; TABLE_ALLOC_LEN]>::try_from(song.table_alloc.to_bytes()).unwrap(),
    );
    put_array(
        &mut buf,
        INSTRUMENT_ALLOC_OFFSET,
        &<[u8; INSTRUMENT_ALLOC_LEN]>::try_from(song.instrument_alloc.to_bytes()).unwrap(),
    );
    put_array(
        &mut buf,
        PHRASE_ALLOC_BITMAP_OFFSET,
        &<[u8; PHRASE_ALLOC_BITMAP_LEN]>::try_from(song.phrase_alloc.to_bytes()).unwrap(),
    );
    put_array(
        &mut buf,
        CHAIN_ALLOC_BITMAP_OFFSET,
        &<[u8; CHAIN_ALLOC_BITMAP_LEN]>::try_from(song.chain_alloc.to_bytes()).unwrap(),
    );

    // rows: unconditional, no fill convention
    for i in 0..ROW_COUNT {
        put_array(&mut buf, ROWS_OFFSET + i * CHANNELS_PER_ROW, &song.rows.entries[i].channels);
    }

    // chains: fill 0xFF phrases / 0x00 transpositions when absent
    write_16_arrays(
        &mut buf,
        CHAIN_PHRASES_OFFSET,
        (0..CHAIN_COUNT).map(|i| {
            if song.chain_alloc.get(i) {
                song.chains.entries[i].phrases
            } else {
                [0xFFu8; 16]
            }
        }),
    );
    write_16_arrays(
        &mut buf,
        CHAIN_TRANSPOSITIONS_OFFSET,
        (0..CHAIN_COUNT).map(|i| {
            if song.chain_alloc.get(i) {
                let mut out = [0u8; 16];
                for (j, v) in song.chains.entries[i].transpositions.iter().enumerate() {
                    out[j] = *v as u8;
                }
                out
            } else {
                [0u8; 16]
            }
        }),
    );

    // phrases: notes skipped (0x00) when absent, instruments fill 0xFF, commands 0x00
    write_16_arrays(
        &mut buf,
        PHRASE_NOTES_OFFSET,
        (0..PHRASE_COUNT).map(|i| {
            if song.phrase_alloc.get(i) {
                song.phrases.entries[i].notes
            } else {
                [0u8; 16]
            }
        }),
    );
    write_16_arrays(
        &mut buf,
        PHRASE_INSTRUMENTS_OFFSET,
        (0..PHRASE_COUNT).map(|i| {
            if song.phrase_alloc.get(i) {
                song.phrases.entries[i].instruments
            } else {
                [0xFFu8; 16]
            }
        }),
    );
    write_16_arrays(
        &mut buf,
        PHRASE_COMMAND_CODES_OFFSET,
        (0..PHRASE_COUNT).map(|i| {
            if song.phrase_alloc.get(i) {
                song.phrases.entries[i].command_codes
            } else {
                [0u8; 16]
            }
        }),
    );
    write_16_arrays(
        &mut buf,
        PHRASE_COMMAND_VALUES_OFFSET,
        (0..PHRASE_COUNT).map(|i| {
            if song.phrase_alloc.get(i) {
                song.phrases.entries[i].command_values
            } else {
                [0u8; 16]
            }
        }),
    );

    // instruments: default-instrument payload when absent, names always written verbatim
    for i in 0..INSTRUMENT_COUNT {
        let payload = if song.instrument_alloc.get(i) {
            *song.instruments.entries[i].as_bytes()
        } else {
            *Instrument::default_payload().as_bytes()
        };
        put_array(&mut buf, INSTRUMENT_PAYLOADS_OFFSET + i * 16, &payload);
        put_array(
            &mut buf,
            INSTRUMENT_NAMES_OFFSET + i * INSTRUMENT_NAME_LEN,
            song.instruments.names[i].as_bytes(),
        );
    }

    // tables: all sub-arrays 0x00 when absent
    for i in 0..TABLE_COUNT {
        let present = song.table_alloc.get(i);
        let entry = &song.tables.entries[i];
        let envelopes = if present { entry.envelopes } else { [0u8; 16] };
        let transpositions = if present { entry.transpositions } else { [0u8; 16] };
        let value1 = if present { entry.value1 } else { [0u8; 16] };
        let value2 = if present { entry.value2 } else { [0u8; 16] };
        let mut cmd1 = [0u8; 16];
        let mut cmd2 = [0u8; 16];
        if present {
            for j in 0..16 {
                cmd1[j] = table::encode_table_command(entry.command1[j], song.version)?;
                cmd2[j] = table::encode_table_command(entry.command2[j], song.version)?;
            }
        }
        put_array(&mut buf, TABLE_ENVELOPES_OFFSET + i * 16, &envelopes);
        put_array(&mut buf, TABLE_TRANSPOSITIONS_OFFSET + i * 16, &transpositions);
        put_array(&mut buf, TABLE_CMD1_COMMANDS_OFFSET + i * 16, &cmd1);
        put_array(&mut buf, TABLE_CMD1_VALUES_OFFSET + i * 16, &value1);
        put_array(&mut buf, TABLE_CMD2_COMMANDS_OFFSET + i * 16, &cmd2);
        put_array(&mut buf, TABLE_CMD2_VALUES_OFFSET + i * 16, &value2);
    }

    // synths, waves, grooves, words: unconditional, always written verbatim
    for i in 0..SYNTH_COUNT {
        let off = SYNTHS_OFFSET + i * SYNTH_RECORD_LEN;
        put_array(&mut buf, off, &song.synths.entries[i].params);
        put_array(&mut buf, off + 14, &song.synths.entries[i].reserved);
    }
    for i in 0..WAVE_COUNT {
        put_array(&mut buf, WAVES_OFFSET + i * 16, &song.waves.entries[i].samples);
    }
    for i in 0..GROOVE_COUNT {
        put_array(&mut buf, GROOVES_OFFSET + i * 16, &song.grooves.entries[i].steps);
    }
    for i in 0..WORD_COUNT {
        let off = WORD_ALLOPHONES_OFFSET + i * 16;
        put_array(&mut buf, off, &song.words.entries[i].allophones);
        put_array(&mut buf, off + 8, &song.words.entries[i].lengths);
        put_array(
            &mut buf,
            WORD_NAMES_OFFSET + i * WORD_NAME_LEN,
            song.words.names[i].as_bytes(),
        );
    }

    put_array(&mut buf, BOOKMARKS_OFFSET, song.bookmarks.as_bytes());

    let m = &song.meta;
    let wt = m.work_time.to_le_bytes();
    let tt = m.total_time.to_le_bytes();
    let meta_bytes: [u8; META_LEN] = [
        wt[0],
        wt[1],
        m.tempo,
        m.transposition,
        tt[0],
        tt[1],
        m.reserved_checksum,
        m.key_delay,
        m.key_repeat,
        m.font,
        m.sync,
        m.color_set,
        m.reserved,
        m.clone,
        m.changed,
        m.power_save,
        m.pre_listen,
    ];
    put_array(&mut buf, META_OFFSET, &meta_bytes);

    put_array(&mut buf, WAVE_SYNTH_LOCK_OFFSET, song.wave_synth_lock.as_bytes());

    put_array(&mut buf, RESERVED_1040_OFFSET, &song.reserved.reserved_1040);
    put_array(&mut buf, RESERVED_1FBA_OFFSET, &song.reserved.reserved_1fba);
    put_array(&mut buf, RESERVED_2000_OFFSET, &song.reserved.reserved_2000);
    put_array(&mut buf, RESERVED_3FC6_OFFSET, &song.reserved.reserved_3fc6);
    put_array(&mut buf, RESERVED_6100_OFFSET, &song.reserved.reserved_6100);
    put_array(&mut buf, RESERVED_7FF2_OFFSET, &song.reserved.reserved_7ff2);

    Ok(buf)
}

/// Read a [`SongImage`] from a 32 KiB byte stream.
pub fn read_song_image(stream: &mut impl ByteStream) -> crate::Result<SongImage> {
    let bytes = stream.read_exact_n(SONG_IMAGE_LEN).map_err(crate::Error::from)?;
    parse_buffer(&bytes).map_err(crate::Error::from)
}

/// Write a [`SongImage`] as exactly 32 KiB to a byte stream.
pub fn write_song_image(song: &SongImage, stream: &mut impl ByteStream) -> crate::Result<()> {
    let buf = write_buffer(song).map_err(crate::Error::from)?;
    stream.write_all_at(&buf).map_err(crate::Error::from)
}
