//! A thin capability wrapper over `std::io`, generalizing the teacher's read-only
//! `ByteIter`/write-only `Scribe` split into a single read+write+seek capability set. The
//! codec and the save/song serializers are written against `ByteStream` so that they can
//! drive a file handle or an in-memory cursor uniformly.
use crate::error::LibResult;
use snafu::ResultExt;
use std::io::{Read, Seek, SeekFrom, Write};

/// Random-access byte source/sink: read `n` bytes, write `n` bytes, seek, tell.
///
/// Any `T: Read + Write + Seek` implements this via the blanket impl below, so a
/// `std::fs::File` or a `std::io::Cursor<Vec<u8>>` is usable without adapter boilerplate.
pub trait ByteStream: Read + Write + Seek {}

impl<T: Read + Write + Seek> ByteStream for T {}

/// Convenience methods layered on top of [`ByteStream`], each wrapping the underlying
/// `std::io::Error` into this crate's [`crate::error::Error`] with call-site context.
pub(crate) trait ByteStreamExt: ByteStream {
    fn read_exact_n(&mut self, n: usize) -> LibResult<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf).context(io!())?;
        Ok(buf)
    }

    fn read_u8(&mut self) -> LibResult<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf).context(io!())?;
        Ok(buf[0])
    }

    fn write_all_at(&mut self, bytes: &[u8]) -> LibResult<()> {
        self.write_all(bytes).context(io!())
    }

    fn tell(&mut self) -> LibResult<u64> {
        self.stream_position().context(io!())
    }

    fn seek_abs(&mut self, pos: u64) -> LibResult<u64> {
        self.seek(SeekFrom::Start(pos)).context(io!())
    }

    fn seek_rel(&mut self, offset: i64) -> LibResult<u64> {
        self.seek(SeekFrom::Current(offset)).context(io!())
    }

    fn seek_end(&mut self, offset: i64) -> LibResult<u64> {
        self.seek(SeekFrom::End(offset)).context(io!())
    }
}

impl<T: ByteStream> ByteStreamExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_write_roundtrip() {
        let mut cursor = Cursor::new(vec![0u8; 8]);
        cursor.write_all_at(&[1, 2, 3, 4]).unwrap();
        cursor.seek_abs(0).unwrap();
        let bytes = cursor.read_exact_n(4).unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn tell_and_seek_end() {
        let mut cursor = Cursor::new(vec![0u8; 16]);
        assert_eq!(cursor.tell().unwrap(), 0);
        cursor.seek_end(-1).unwrap();
        assert_eq!(cursor.tell().unwrap(), 15);
        cursor.seek_rel(-5).unwrap();
        assert_eq!(cursor.tell().unwrap(), 10);
    }

    #[test]
    fn short_read_is_io_error() {
        let mut cursor = Cursor::new(vec![0u8; 2]);
        let err = cursor.read_exact_n(4).unwrap_err();
        assert!(matches!(err, crate::error::LibError::Io { .. }));
    }
}
