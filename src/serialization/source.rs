//! Byte source capability for stream decoding
//!
//! Stream decoders only need "give me the next byte, or fail". Keeping the
//! capability this narrow decouples the codec from any particular I/O stack.

use crate::error::Result;
use std::io::Read;

/// A sequential source yielding one byte per call
///
/// End of input is reported as [`WireError::UnexpectedEof`](crate::error::WireError::UnexpectedEof):
/// decoders only ask for a byte when one is required to complete a value,
/// so running dry is always a truncation.
pub trait ByteSource {
    /// Read the next byte, or fail
    fn read_byte(&mut self) -> Result<u8>;
}

/// Every `std::io::Read` is a byte source: slices, cursors, sockets, files.
///
/// `read_exact` retries on `ErrorKind::Interrupted`.
impl<R: Read + ?Sized> ByteSource for R {
    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}
