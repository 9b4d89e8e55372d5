//! For reading and writing an 8-bit handheld music tracker's save file format.
//!
//! The crate is organized bottom-up, following the format's own layering: [`codec`] is
//! the block-packed RLE/dictionary stream codec, [`song`] is the 32 KiB decompressed
//! song image built on top of it, and [`save`] is the 131,072-byte save container that
//! ties a working song and a bank of compressed project songs together. Top-level
//! functions in this module are the only entry points most callers need; the submodules
//! stay public for callers who want to work with a single song image, or the codec,
//! directly.
#![allow(dead_code)]

#[macro_use]
mod error;
#[macro_use]
mod clamp;
#[macro_use]
mod macros;

mod byte_stream;
pub mod codec;
pub mod constants;
pub mod name;
pub mod save;
pub mod song;

pub use byte_stream::ByteStream;
pub use error::{Error, Result};
pub use name::Name;
pub use save::{Project, Save};
pub use song::SongImage;

/// Read a whole save file (131,072 bytes: working song, header, project table, and
/// compressed block region) from a stream.
pub fn read_save(stream: &mut impl ByteStream) -> Result<Save> {
    save::read_save(stream)
}

/// Write a whole save file to a stream.
pub fn write_save(save: &Save, stream: &mut impl ByteStream) -> Result<()> {
    save::write_save(save, stream)
}

/// Read a standalone 32 KiB decompressed song image from a stream (no save container
/// framing). Useful for tooling that works with bare song dumps.
pub fn read_song_image(stream: &mut impl ByteStream) -> Result<SongImage> {
    song::read_song_image(stream)
}

/// Write a standalone 32 KiB song image to a stream, with no save container framing.
pub fn write_song_image(song: &SongImage, stream: &mut impl ByteStream) -> Result<()> {
    song::write_song_image(song, stream)
}
