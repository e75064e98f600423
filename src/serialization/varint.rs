//! Bitcoin VarInt (CompactSize) encoding/decoding
//!
//! VarInt is the compact integer encoding used throughout Bitcoin's wire
//! format for lengths and counts. It uses 1, 3, 5 or 9 bytes depending on
//! the value.
//!
//! Encoding rules:
//! - If value < 0xfd: single byte
//! - If value <= 0xffff: 0xfd prefix + 2 bytes (little-endian)
//! - If value <= 0xffffffff: 0xfe prefix + 4 bytes (little-endian)
//! - Otherwise: 0xff prefix + 8 bytes (little-endian)
//!
//! Three access patterns are offered: write into a caller-provided buffer,
//! decode from a buffer, and read incrementally from a [`ByteSource`].

use super::source::ByteSource;
use crate::constants::{
    MAX_VARINT_LEN_16, MAX_VARINT_LEN_32, MAX_VARINT_LEN_64, MAX_VARINT_LEN_8,
    VARINT_MARKER_U16, VARINT_MARKER_U32, VARINT_MARKER_U64,
};
use crate::error::{Result, WireError};
use std::borrow::Cow;
use tracing::{debug, trace};

/// Canonical encoded length of `value`: 1, 3, 5 or 9
///
/// # Examples
///
/// ```
/// use blvm_wire::serialization::varint::varint_len;
///
/// assert_eq!(varint_len(0xfc), 1);
/// assert_eq!(varint_len(0xfd), 3);
/// assert_eq!(varint_len(0x10000), 5);
/// assert_eq!(varint_len(u64::MAX), 9);
/// ```
#[inline]
pub const fn varint_len(value: u64) -> usize {
    match value {
        0..=0xfc => MAX_VARINT_LEN_8,
        0xfd..=0xffff => MAX_VARINT_LEN_16,
        0x1_0000..=0xffff_ffff => MAX_VARINT_LEN_32,
        _ => MAX_VARINT_LEN_64,
    }
}

/// Total encoded length announced by the first byte of a varint
///
/// Lets framing code know how many bytes to wait for once the first byte
/// has arrived.
#[inline]
pub const fn varint_prefix_len(first_byte: u8) -> usize {
    match first_byte {
        VARINT_MARKER_U16 => MAX_VARINT_LEN_16,
        VARINT_MARKER_U32 => MAX_VARINT_LEN_32,
        VARINT_MARKER_U64 => MAX_VARINT_LEN_64,
        _ => MAX_VARINT_LEN_8,
    }
}

/// Assemble a little-endian value from up to 8 bytes
#[inline]
fn le_value(bytes: &[u8]) -> u64 {
    let mut le = [0u8; 8];
    le[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(le)
}

/// Write the canonical encoding; caller guarantees `buf` is large enough
#[inline]
fn write_varint(buf: &mut [u8], value: u64) -> usize {
    let len = varint_len(value);
    match len {
        MAX_VARINT_LEN_8 => buf[0] = value as u8,
        MAX_VARINT_LEN_16 => {
            buf[0] = VARINT_MARKER_U16;
            buf[1..3].copy_from_slice(&(value as u16).to_le_bytes());
        }
        MAX_VARINT_LEN_32 => {
            buf[0] = VARINT_MARKER_U32;
            buf[1..5].copy_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            buf[0] = VARINT_MARKER_U64;
            buf[1..9].copy_from_slice(&value.to_le_bytes());
        }
    }
    len
}

/// Encode `value` into the start of `buf`, returning the bytes written
///
/// # Panics
///
/// Panics if `buf` is shorter than [`varint_len(value)`](varint_len). An
/// undersized buffer is a caller bug, not a data problem; size buffers with
/// [`MAX_VARINT_LEN_64`] when the value is not known ahead of time. Nothing
/// is written when the check fails.
///
/// # Examples
///
/// ```
/// use blvm_wire::serialization::varint::put_varint;
///
/// let mut buf = [0u8; 5];
/// assert_eq!(put_varint(&mut buf, 1344), 3);
/// assert_eq!(buf, [0xfd, 0x40, 0x05, 0x00, 0x00]);
/// ```
pub fn put_varint(buf: &mut [u8], value: u64) -> usize {
    let required = varint_len(value);
    assert!(
        buf.len() >= required,
        "put_varint: buffer of {} bytes too small for {required}-byte varint of {value:#x}",
        buf.len()
    );
    write_varint(buf, value)
}

/// Checked form of [`put_varint`]
///
/// # Errors
///
/// Returns `WireError::BufferTooSmall` (leaving `buf` untouched) instead
/// of panicking when `buf` cannot hold the encoding.
pub fn try_put_varint(buf: &mut [u8], value: u64) -> Result<usize> {
    let required = varint_len(value);
    if buf.len() < required {
        return Err(WireError::BufferTooSmall {
            required,
            available: buf.len(),
        });
    }
    Ok(write_varint(buf, value))
}

/// Encode a u64 value as a freshly allocated VarInt
///
/// # Examples
///
/// ```
/// use blvm_wire::serialization::varint::encode_varint;
///
/// assert_eq!(encode_varint(0), vec![0]);
/// assert_eq!(encode_varint(252), vec![252]);
/// assert_eq!(encode_varint(253), vec![0xfd, 253, 0]);
/// assert_eq!(encode_varint(65536), vec![0xfe, 0, 0, 1, 0]);
/// ```
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut result = vec![0u8; varint_len(value)];
    write_varint(&mut result, value);
    result
}

/// Decode a VarInt from the start of `buf`
///
/// Returns the value and the number of bytes consumed. `None` means `buf`
/// is empty or shorter than the length its first byte announces: the
/// "not enough data yet" outcome, equivalent to zero bytes consumed.
/// Trailing bytes past the encoding are ignored.
///
/// Decoding is lenient about non-canonical input: `[0xfd, 0x01, 0x00]`
/// yields `(1, 3)`. Use [`decode_varint_strict`] to enforce Bitcoin Core's
/// CompactSize rule.
///
/// # Examples
///
/// ```
/// use blvm_wire::serialization::varint::decode_varint;
///
/// assert_eq!(decode_varint(&[0xfd, 0x40, 0x05, 0x00, 0x00]), Some((1344, 3)));
/// assert_eq!(decode_varint(&[0xfd, 0x40]), None);
/// assert_eq!(decode_varint(&[]), None);
/// ```
pub fn decode_varint(buf: &[u8]) -> Option<(u64, usize)> {
    let (&first, rest) = buf.split_first()?;

    let len = varint_prefix_len(first);
    if len == MAX_VARINT_LEN_8 {
        return Some((first as u64, MAX_VARINT_LEN_8));
    }

    if buf.len() < len {
        trace!(
            marker = first,
            needed = len,
            available = buf.len(),
            "varint buffer decode needs more data"
        );
        return None;
    }

    Some((le_value(&rest[..len - 1]), len))
}

/// Decode a VarInt, rejecting truncated and non-canonical encodings
///
/// Matches Bitcoin Core's ReadCompactSize: a value must use the shortest
/// marker able to carry it.
///
/// # Errors
///
/// - `WireError::InsufficientBytes` if `buf` ends before the encoding does
/// - `WireError::NonCanonical` if a shorter encoding exists for the value
///
/// # Examples
///
/// ```
/// use blvm_wire::serialization::varint::decode_varint_strict;
///
/// assert_eq!(decode_varint_strict(&[0xfd, 253, 0]), Ok((253, 3)));
/// assert!(decode_varint_strict(&[0xfd, 252, 0]).is_err());
/// assert!(decode_varint_strict(&[]).is_err());
/// ```
pub fn decode_varint_strict(data: &[u8]) -> Result<(u64, usize)> {
    let (value, consumed) = decode_varint(data).ok_or_else(|| {
        WireError::InsufficientBytes(Cow::Owned(format!(
            "varint needs {} bytes, {} available",
            data.first().map_or(MAX_VARINT_LEN_8, |&b| varint_prefix_len(b)),
            data.len()
        )))
    })?;

    check_canonical(value, consumed)?;
    Ok((value, consumed))
}

/// Reject a value that was encoded with a longer marker than it needs
pub(crate) fn check_canonical(value: u64, consumed: usize) -> Result<()> {
    let canonical = varint_len(value);
    if canonical != consumed {
        debug!(value, consumed, canonical, "rejecting non-canonical varint");
        return Err(WireError::NonCanonical(Cow::Owned(format!(
            "value {value:#x} encoded in {consumed} bytes, canonical length is {canonical}"
        ))));
    }
    Ok(())
}

/// Read a VarInt from a byte source, one byte at a time
///
/// # Errors
///
/// Propagates the source's failure, including when it runs dry after the
/// marker byte but before every follow-up byte has arrived. A partial value
/// is never returned.
///
/// # Examples
///
/// ```
/// use blvm_wire::serialization::varint::read_varint;
///
/// let mut stream: &[u8] = &[0xfe, 0x00, 0x00, 0x01, 0x00, 0x2a];
/// assert_eq!(read_varint(&mut stream), Ok(0x10000));
/// assert_eq!(stream, &[0x2a]);
/// ```
pub fn read_varint<S: ByteSource + ?Sized>(source: &mut S) -> Result<u64> {
    read_varint_sized(source).map(|(value, _)| value)
}

/// Read a VarInt from a byte source, also reporting the bytes consumed
///
/// # Errors
///
/// As [`read_varint`].
pub fn read_varint_sized<S: ByteSource + ?Sized>(source: &mut S) -> Result<(u64, usize)> {
    let first = source.read_byte()?;

    let len = varint_prefix_len(first);
    if len == MAX_VARINT_LEN_8 {
        return Ok((first as u64, MAX_VARINT_LEN_8));
    }

    let mut le = [0u8; 8];
    for (read, slot) in le[..len - 1].iter_mut().enumerate() {
        *slot = source.read_byte().inspect_err(|err| {
            debug!(
                marker = first,
                read,
                needed = len - 1,
                error = %err,
                "varint truncated after marker byte"
            );
        })?;
    }

    Ok((u64::from_le_bytes(le), len))
}
