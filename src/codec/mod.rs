//! The block-packed stream codec: [`decompress`] turns a chain of 512-byte blocks back
//! into a 32 KiB song image, [`compress`] packs a song image back into blocks.
//!
//! Grounded on the reference decompressor's `decompress_until_eof`/`decompress_cmd_byte`
//! split (one marker byte selects between run-length and special-action sub-protocols,
//! a `Continuation` enum distinguishes "keep going" from "jump" from "end of file"); the
//! compressor is this crate's own addition, following the teacher's running-byte-budget
//! bookkeeping style used when flushing fixed-size chunks.
use crate::byte_stream::{ByteStream, ByteStreamExt};
use crate::constants::*;
use crate::error::LibResult;
use log::trace;
use snafu::ensure;

/// What the decompressor stopped on: a `0xE0 <block>` jump, or `0xE0 0xFF` end of stream.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Continuation {
    /// Decoding reached an in-band jump to the given 1-based block index.
    JumpToBlock(u8),
    /// Decoding reached the `0xE0 0xFF` end-of-stream marker.
    EndOfFile,
}

/// Absolute byte offset of the start of the given 1-based block index, relative to
/// `anchor` (the start of the save's block region).
fn block_position(anchor: u64, block: u8) -> u64 {
    anchor + BLOCK_SIZE as u64 * (block as u64 - 1)
}

/// Decode one run-length event (`0xC0` already consumed) and write it to `writer`.
fn decompress_rle_event(
    reader: &mut impl ByteStream,
    writer: &mut impl ByteStream,
) -> LibResult<()> {
    let next = reader.read_u8()?;
    if next == RLE_BYTE {
        write_u8!(writer, RLE_BYTE)?;
        trace!("codec: literal 0xC0");
    } else {
        let count = reader.read_u8()?;
        trace!("codec: run of {:#x} x {}", next, count);
        for _ in 0..count {
            write_u8!(writer, next)?;
        }
    }
    Ok(())
}

/// Decode one special-action event (`0xE0` already consumed). Returns `None` if decoding
/// should simply continue, `Some(Continuation)` if the caller must act (jump or stop).
fn decompress_cmd_event(
    reader: &mut impl ByteStream,
    writer: &mut impl ByteStream,
) -> LibResult<Option<Continuation>> {
    let sub = reader.read_u8()?;
    match sub {
        CMD_BYTE => {
            write_u8!(writer, CMD_BYTE)?;
            trace!("codec: literal 0xE0");
            Ok(None)
        }
        DEFAULT_WAVE_BYTE => {
            let count = reader.read_u8()?;
            trace!("codec: default wave x {}", count);
            for _ in 0..count {
                writer.write_all_at(&DEFAULT_WAVE)?;
            }
            Ok(None)
        }
        DEFAULT_INSTRUMENT_BYTE => {
            let count = reader.read_u8()?;
            trace!("codec: default instrument x {}", count);
            for _ in 0..count {
                writer.write_all_at(&DEFAULT_INSTRUMENT)?;
            }
            Ok(None)
        }
        EOF_BYTE => Ok(Some(Continuation::EndOfFile)),
        block => Ok(Some(Continuation::JumpToBlock(block))),
    }
}

/// Decode a 32 KiB song image from a block-packed stream.
///
/// `reader` must be positioned at the first block of the project's chain. `anchor` is the
/// absolute offset of the start of the save's block region, used to resolve in-band
/// block-jump bytes. When `follow_jumps` is `true` (the normal case), the decoder seeks
/// and keeps decoding until `0xE0 0xFF`, and fails with a size-mismatch [`crate::Error`] if
/// the total written does not come to exactly 32,768 bytes. When `false` (the diagnostic,
/// single-block mode), decoding stops at the first jump or end-of-file marker and that
/// stopping point is returned without seeking.
pub fn decompress(
    reader: &mut impl ByteStream,
    writer: &mut impl ByteStream,
    anchor: u64,
    follow_jumps: bool,
) -> LibResult<Continuation> {
    loop {
        let marker = reader.read_u8()?;
        let continuation = if marker == RLE_BYTE {
            decompress_rle_event(reader, writer)?;
            None
        } else if marker == CMD_BYTE {
            decompress_cmd_event(reader, writer)?
        } else {
            write_u8!(writer, marker)?;
            None
        };

        if let Some(continuation) = continuation {
            if !follow_jumps {
                return Ok(continuation);
            }
            match continuation {
                Continuation::JumpToBlock(block) => {
                    ensure!(
                        block >= 1,
                        crate::error::Format {
                            site: site!(),
                            description: "malformed block-jump marker: block 0",
                        }
                    );
                    reader.seek_abs(block_position(anchor, block))?;
                }
                Continuation::EndOfFile => {
                    let written = writer.tell()?;
                    ensure!(
                        written == SONG_IMAGE_LEN as u64,
                        crate::error::Format {
                            site: site!(),
                            description: format!(
                                "decompressed size mismatch: expected {} bytes, got {}",
                                SONG_IMAGE_LEN, written
                            ),
                        }
                    );
                    return Ok(Continuation::EndOfFile);
                }
            }
        }
    }
}

/// One pattern match found at the compressor's current read position.
enum Event<'a> {
    DefaultWave(u8),
    DefaultInstrument(u8),
    EscapedRle,
    EscapedCmd,
    Run(u8, u8),
    Literal(&'a u8),
}

impl Event<'_> {
    /// Number of bytes this event consumes from the input song image.
    fn input_len(&self) -> usize {
        match self {
            Event::DefaultWave(count) => 16 * *count as usize,
            Event::DefaultInstrument(count) => 16 * *count as usize,
            Event::EscapedRle | Event::EscapedCmd | Event::Literal(_) => 1,
            Event::Run(_, count) => *count as usize,
        }
    }

    /// Number of bytes this event takes up once encoded.
    fn encoded_len(&self) -> usize {
        match self {
            Event::DefaultWave(_) | Event::DefaultInstrument(_) => 3,
            Event::EscapedRle | Event::EscapedCmd => 2,
            Event::Run(_, _) => 3,
            Event::Literal(_) => 1,
        }
    }

    fn write(&self, writer: &mut impl ByteStream) -> LibResult<()> {
        match self {
            Event::DefaultWave(count) => writer.write_all_at(&[CMD_BYTE, DEFAULT_WAVE_BYTE, *count]),
            Event::DefaultInstrument(count) => {
                writer.write_all_at(&[CMD_BYTE, DEFAULT_INSTRUMENT_BYTE, *count])
            }
            Event::EscapedRle => writer.write_all_at(&[RLE_BYTE, RLE_BYTE]),
            Event::EscapedCmd => writer.write_all_at(&[CMD_BYTE, CMD_BYTE]),
            Event::Run(byte, count) => writer.write_all_at(&[RLE_BYTE, *byte, *count]),
            Event::Literal(byte) => writer.write_all_at(std::slice::from_ref(byte)),
        }
    }
}

/// Find the next event to emit at `song[pos..]`, applying the five pattern detectors in
/// priority order.
fn next_event(song: &[u8], pos: usize) -> Event<'_> {
    if song.len() - pos >= 16 && song[pos..pos + 16] == DEFAULT_WAVE {
        return Event::DefaultWave(count_repeats(song, pos, 16));
    }
    if song.len() - pos >= 16 && song[pos..pos + 16] == DEFAULT_INSTRUMENT {
        return Event::DefaultInstrument(count_repeats(song, pos, 16));
    }
    if song[pos] == RLE_BYTE {
        return Event::EscapedRle;
    }
    if song[pos] == CMD_BYTE {
        return Event::EscapedCmd;
    }
    if song.len() - pos >= 4 {
        let byte = song[pos];
        let mut run = 1usize;
        while pos + run < song.len() && song[pos + run] == byte && run < MAX_RUN {
            run += 1;
        }
        if run >= 4 {
            return Event::Run(byte, run as u8);
        }
    }
    Event::Literal(&song[pos])
}

/// Count how many back-to-back `window`-byte chunks starting at `pos` are identical,
/// capped at [`MAX_RUN`].
fn count_repeats(song: &[u8], pos: usize, window: usize) -> u8 {
    let chunk = &song[pos..pos + window];
    let mut count = 1usize;
    let mut p = pos + window;
    while count < MAX_RUN && p + window <= song.len() && &song[p..p + window] == chunk {
        count += 1;
        p += window;
    }
    count as u8
}

/// Compress a 32 KiB song image into the block region of `writer`, starting at block
/// `start_block` (0-based). Returns the number of blocks consumed.
///
/// On success, decompressing the written bytes (with `anchor` pointed at the start of the
/// block region) reproduces `song` exactly. On [`crate::Error`] (insufficient remaining
/// blocks), the portion of `writer` written so far is rolled back to its position on entry
/// and zero-filled.
pub fn compress(song: &[u8], writer: &mut impl ByteStream, start_block: u8) -> LibResult<u8> {
    debug_assert_eq!(song.len(), SONG_IMAGE_LEN);
    let origin = writer.tell()?;
    match compress_inner(song, writer, start_block) {
        Ok(used) => Ok(used),
        Err(e) => {
            writer.seek_abs(origin)?;
            // zero-fill whatever was written so far, up to the full budget we might have
            // attempted, so a retried write starts from a clean slate.
            let end = writer.seek_end(0)?;
            writer.seek_abs(origin)?;
            let remaining = (end - origin) as usize;
            if remaining > 0 {
                writer.write_all_at(&vec![0u8; remaining])?;
                writer.seek_abs(origin)?;
            }
            Err(e)
        }
    }
}

fn compress_inner(song: &[u8], writer: &mut impl ByteStream, start_block: u8) -> LibResult<u8> {
    let mut pos = 0usize;
    let mut current_block = start_block;
    let mut current_block_size = 0usize;

    while pos < song.len() {
        let event = next_event(song, pos);
        let encoded_len = event.encoded_len();

        if current_block_size + encoded_len + 2 >= BLOCK_SIZE {
            ensure!(
                (current_block as usize) + 1 < BLOCK_COUNT,
                crate::error::Capacity {
                    site: site!(),
                    description: "song does not fit in the remaining blocks",
                }
            );
            trace!("codec: terminating block {}", current_block);
            // The jump byte is the 1-based data-block number of the *next* block: for a
            // 0-based global block index `current_block`, the next block's 1-based number
            // is `current_block + 2` (one to make it 1-based, one to advance).
            writer.write_all_at(&[CMD_BYTE, current_block + 2])?;
            let pad = BLOCK_SIZE - current_block_size - 2;
            writer.write_all_at(&vec![0u8; pad])?;
            current_block += 1;
            current_block_size = 0;
            continue;
        }

        event.write(writer)?;
        pos += event.input_len();
        current_block_size += encoded_len;
    }

    writer.write_all_at(&[CMD_BYTE, EOF_BYTE])?;
    current_block_size += 2;
    let pad = BLOCK_SIZE - current_block_size;
    writer.write_all_at(&vec![0u8; pad])?;

    Ok(current_block - start_block + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decompress_bytes(bytes: &[u8]) -> Vec<u8> {
        let mut reader = Cursor::new(bytes.to_vec());
        let mut out = Cursor::new(Vec::new());
        decompress(&mut reader, &mut out, 0, true).unwrap();
        out.into_inner()
    }

    fn compress_bytes(song: &[u8]) -> (Vec<u8>, u8) {
        let mut writer = Cursor::new(Vec::new());
        let used = compress(song, &mut writer, 0).unwrap();
        (writer.into_inner(), used)
    }

    #[test]
    fn all_zeros_round_trips() {
        let song = vec![0u8; SONG_IMAGE_LEN];
        let (compressed, used) = compress_bytes(&song);
        assert!(compressed.starts_with(&[RLE_BYTE, 0x00, 0xFF]));
        assert_eq!(compressed.len(), used as usize * BLOCK_SIZE);
        assert_eq!(decompress_bytes(&compressed), song);
    }

    #[test]
    fn literal_0xc0_round_trips() {
        let mut song = vec![0u8; SONG_IMAGE_LEN];
        song[100] = 0xC0;
        song[101] = 0x01;
        song[102] = 0x02;
        let (compressed, _) = compress_bytes(&song);
        assert_eq!(decompress_bytes(&compressed), song);
    }

    #[test]
    fn default_wave_heavy_round_trips() {
        let mut song = vec![0u8; SONG_IMAGE_LEN];
        for chunk in song[0..16 * 20].chunks_mut(16) {
            chunk.copy_from_slice(&DEFAULT_WAVE);
        }
        let (compressed, _) = compress_bytes(&song);
        assert!(compressed
            .windows(2)
            .any(|w| w == [CMD_BYTE, DEFAULT_WAVE_BYTE]));
        assert_eq!(decompress_bytes(&compressed), song);
    }

    #[test]
    fn default_instrument_heavy_round_trips() {
        let mut song = vec![0u8; SONG_IMAGE_LEN];
        for chunk in song[32..32 + 16 * 10].chunks_mut(16) {
            chunk.copy_from_slice(&DEFAULT_INSTRUMENT);
        }
        let (compressed, _) = compress_bytes(&song);
        assert_eq!(decompress_bytes(&compressed), song);
    }

    #[test]
    fn incrementing_bytes_round_trip() {
        let mut song = vec![0u8; SONG_IMAGE_LEN];
        for (i, b) in song.iter_mut().enumerate() {
            *b = (i % 256) as u8;
        }
        let (compressed, _) = compress_bytes(&song);
        assert!(compressed.windows(2).any(|w| w == [CMD_BYTE, EOF_BYTE]));
        assert_eq!(decompress_bytes(&compressed), song);
    }

    #[test]
    fn spans_multiple_blocks_with_jumps() {
        // incompressible data forces many block terminations, exercising the in-band
        // jump-to-next-block machinery rather than fitting in a single block.
        let mut song = vec![0u8; SONG_IMAGE_LEN];
        for (i, b) in song.iter_mut().enumerate() {
            *b = ((i * 131 + 7) % 256) as u8;
        }
        let (compressed, used) = compress_bytes(&song);
        assert!(used > 1, "expected multiple blocks, got {}", used);
        assert_eq!(compressed.len(), used as usize * BLOCK_SIZE);
        assert_eq!(decompress_bytes(&compressed), song);
    }

    #[test]
    fn compression_is_deterministic() {
        let mut song = vec![0u8; SONG_IMAGE_LEN];
        for (i, b) in song.iter_mut().enumerate() {
            *b = ((i * 37) % 251) as u8;
        }
        let (a, _) = compress_bytes(&song);
        let (b, _) = compress_bytes(&song);
        assert_eq!(a, b);
    }

    #[test]
    fn total_size_is_multiple_of_block_size() {
        let song = vec![0xAAu8; SONG_IMAGE_LEN];
        let (compressed, _) = compress_bytes(&song);
        assert_eq!(compressed.len() % BLOCK_SIZE, 0);
        assert!(!compressed.is_empty());
    }

    #[test]
    fn capacity_error_rolls_back_and_zero_fills() {
        // a song with no runs/defaults at all compresses to one literal byte per input
        // byte, which cannot possibly fit in the 191-block budget starting near the end.
        let mut song = vec![0u8; SONG_IMAGE_LEN];
        for (i, b) in song.iter_mut().enumerate() {
            // avoid runs of 4+ and avoid matching default tables
            *b = match i % 3 {
                0 => 0x01,
                1 => 0x02,
                _ => 0x03,
            };
        }
        let mut writer = Cursor::new(vec![0xFFu8; BLOCK_SIZE * BLOCK_COUNT]);
        let start = 189u8;
        let err = compress(&song, &mut writer, start).unwrap_err();
        assert!(matches!(err, crate::error::LibError::Capacity { .. }));
        let bytes = writer.into_inner();
        assert!(bytes.iter().all(|b| *b == 0xFF || *b == 0x00));
    }

    #[test]
    fn jump_then_eof_decodes_two_blocks() {
        let mut block0 = vec![0u8; BLOCK_SIZE];
        block0[0] = 0x41;
        block0[1] = CMD_BYTE;
        block0[2] = 2; // jump to block 2

        let mut block1 = vec![0u8; BLOCK_SIZE];
        block1[0] = 0x42;
        block1[1] = CMD_BYTE;
        block1[2] = EOF_BYTE;

        let mut raw = block0;
        raw.extend(block1);

        let mut reader = Cursor::new(raw);
        let mut out = Cursor::new(Vec::new());
        let result = decompress(&mut reader, &mut out, 0, false).unwrap();
        assert_eq!(result, Continuation::JumpToBlock(2));
        assert_eq!(out.into_inner(), vec![0x41]);
    }
}
