/*!
The `macros` module provides macros for internal use.
!*/

/// Write a single byte, attaching io-error site context.
macro_rules! write_u8 {
    ($w:expr, $val:expr) => {
        crate::byte_stream::ByteStreamExt::write_all_at($w, &[$val])
    };
}
