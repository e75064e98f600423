//! Bitcoin VarStr encoding/decoding
//!
//! A VarStr is a byte string prefixed by its length as a VarInt:
//!
//! | Field  | Size | Type     |
//! |--------|------|----------|
//! | length | 1+   | VarInt   |
//! | string | ?    | raw bytes (may be empty) |
//!
//! Used on the wire for user agents, reject reasons and script bytes.

use super::source::ByteSource;
use super::varint::{
    check_canonical, decode_varint, put_varint, read_varint, read_varint_sized, varint_len,
};
use crate::constants::VARSTR_READ_CHUNK;
use crate::error::{Result, WireError};
use tracing::{debug, trace};

/// Total encoded length of a VarStr carrying `payload_len` bytes
#[inline]
pub const fn varstr_len(payload_len: usize) -> usize {
    varint_len(payload_len as u64) + payload_len
}

/// Encode `bytes` as a VarStr at the start of `buf`, returning the bytes written
///
/// # Panics
///
/// Panics before writing anything if `buf` is shorter than
/// [`varstr_len(bytes.len())`](varstr_len). As with
/// [`put_varint`](super::varint::put_varint), an undersized buffer is a
/// caller bug.
///
/// # Examples
///
/// ```
/// use blvm_wire::serialization::varstr::put_varstr;
///
/// let mut buf = [0u8; 15];
/// assert_eq!(put_varstr(&mut buf, b"Hello World!"), 13);
/// assert_eq!(&buf[..13], b"\x0cHello World!");
/// ```
pub fn put_varstr(buf: &mut [u8], bytes: &[u8]) -> usize {
    let required = varstr_len(bytes.len());
    assert!(
        buf.len() >= required,
        "put_varstr: buffer of {} bytes too small for {required}-byte varstr",
        buf.len()
    );
    write_varstr(buf, bytes)
}

/// Checked form of [`put_varstr`]
///
/// # Errors
///
/// Returns `WireError::BufferTooSmall` (leaving `buf` untouched) when
/// `buf` cannot hold the prefix and payload.
pub fn try_put_varstr(buf: &mut [u8], bytes: &[u8]) -> Result<usize> {
    let required = varstr_len(bytes.len());
    if buf.len() < required {
        return Err(WireError::BufferTooSmall {
            required,
            available: buf.len(),
        });
    }
    Ok(write_varstr(buf, bytes))
}

#[inline]
fn write_varstr(buf: &mut [u8], bytes: &[u8]) -> usize {
    let prefix = put_varint(buf, bytes.len() as u64);
    let total = prefix + bytes.len();
    buf[prefix..total].copy_from_slice(bytes);
    total
}

/// Encode `bytes` as a freshly allocated VarStr
pub fn encode_varstr(bytes: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; varstr_len(bytes.len())];
    write_varstr(&mut result, bytes);
    result
}

/// Decode a VarStr from the start of `buf`
///
/// Returns a copy of the payload and the total bytes consumed (prefix plus
/// payload). `None` means the length prefix is incomplete or `buf` holds
/// fewer payload bytes than announced: the "not enough data yet" outcome,
/// equivalent to zero bytes consumed.
///
/// # Examples
///
/// ```
/// use blvm_wire::serialization::varstr::decode_varstr;
///
/// assert_eq!(decode_varstr(&[0x00]), Some((vec![], 1)));
/// assert_eq!(decode_varstr(&[0x02, 0xaa, 0xbb, 0xcc]), Some((vec![0xaa, 0xbb], 3)));
/// assert_eq!(decode_varstr(&[0x03, 0xaa]), None);
/// ```
pub fn decode_varstr(buf: &[u8]) -> Option<(Vec<u8>, usize)> {
    let (length, prefix) = decode_varint(buf)?;

    // Announced lengths beyond the address space can never be satisfied
    let total = usize::try_from(length)
        .ok()
        .and_then(|len| len.checked_add(prefix));

    match total {
        Some(total) if buf.len() >= total => Some((buf[prefix..total].to_vec(), total)),
        _ => {
            trace!(
                length,
                prefix,
                available = buf.len(),
                "varstr buffer decode needs more data"
            );
            None
        }
    }
}

/// Read a VarStr from a byte source
///
/// Reads the VarInt length prefix, then exactly that many payload bytes.
/// A zero length yields an empty vector without touching the source again.
///
/// Payload storage grows as bytes arrive, so a hostile length prefix cannot
/// force an allocation larger than `VARSTR_READ_CHUNK` ahead of the data.
/// Use [`read_varstr_limited`] to reject oversized announcements outright.
///
/// # Errors
///
/// Propagates the source's failure while reading the prefix or any
/// payload byte.
pub fn read_varstr<S: ByteSource + ?Sized>(source: &mut S) -> Result<Vec<u8>> {
    let length = read_varint(source)?;
    read_payload(source, length)
}

/// Read a VarStr, rejecting announced lengths above `limit`
///
/// # Errors
///
/// Returns `WireError::LengthLimitExceeded` before any payload byte is
/// read if the prefix announces more than `limit` bytes; otherwise as
/// [`read_varstr`].
///
/// # Examples
///
/// ```
/// use blvm_wire::error::WireError;
/// use blvm_wire::serialization::varstr::read_varstr_limited;
///
/// let mut stream: &[u8] = b"\x05hello";
/// assert_eq!(read_varstr_limited(&mut stream, 4), Err(WireError::LengthLimitExceeded { length: 5, limit: 4 }));
/// ```
pub fn read_varstr_limited<S: ByteSource + ?Sized>(
    source: &mut S,
    limit: u64,
) -> Result<Vec<u8>> {
    read_varstr_checked(source, limit, false)
}

/// Shared body of the bounded readers; `require_canonical` also rejects a
/// non-canonical length prefix
pub(crate) fn read_varstr_checked<S: ByteSource + ?Sized>(
    source: &mut S,
    limit: u64,
    require_canonical: bool,
) -> Result<Vec<u8>> {
    let (length, prefix) = read_varint_sized(source)?;
    if require_canonical {
        check_canonical(length, prefix)?;
    }
    if length > limit {
        debug!(length, limit, "rejecting oversized varstr");
        return Err(WireError::LengthLimitExceeded { length, limit });
    }
    read_payload(source, length)
}

fn read_payload<S: ByteSource + ?Sized>(source: &mut S, length: u64) -> Result<Vec<u8>> {
    let capacity = usize::try_from(length)
        .unwrap_or(usize::MAX)
        .min(VARSTR_READ_CHUNK);
    let mut payload = Vec::with_capacity(capacity);

    for read in 0..length {
        let byte = source.read_byte().inspect_err(|err| {
            debug!(read, length, error = %err, "varstr payload truncated");
        })?;
        payload.push(byte);
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_prefix(prefix: &[u8], payload: &[u8]) -> Vec<u8> {
        [prefix, payload].concat()
    }

    fn cases() -> Vec<(Vec<u8>, Vec<u8>)> {
        vec![
            (vec![], vec![0x00]),
            (vec![0xaa], vec![0x01, 0xaa]),
            (vec![0xaa; 0xfc], with_prefix(&[0xfc], &[0xaa; 0xfc])),
            (vec![0xaa; 0xfd], with_prefix(&[0xfd, 0xfd, 0x00], &[0xaa; 0xfd])),
            (vec![0xaa; 0xfe], with_prefix(&[0xfd, 0xfe, 0x00], &[0xaa; 0xfe])),
            (vec![0xaa; 0xff], with_prefix(&[0xfd, 0xff, 0x00], &[0xaa; 0xff])),
            (
                [0xaa, 0xbb].repeat(128),
                with_prefix(&[0xfd, 0x00, 0x01], &[0xaa, 0xbb].repeat(128)),
            ),
        ]
    }

    #[test]
    fn test_put_varstr_cases() {
        let mut buf = [0u8; 1000];
        for (payload, expected) in cases() {
            let written = put_varstr(&mut buf, &payload);
            assert_eq!(written, expected.len());
            assert_eq!(&buf[..written], &expected[..]);
            assert_eq!(encode_varstr(&payload), expected);
        }
    }

    #[test]
    fn test_decode_varstr_cases() {
        for (payload, encoded) in cases() {
            assert_eq!(decode_varstr(&encoded), Some((payload, encoded.len())));
        }
    }

    #[test]
    fn test_read_varstr_cases() {
        for (payload, encoded) in cases() {
            assert_eq!(read_varstr(&mut encoded.as_slice()), Ok(payload));
        }
    }

    #[test]
    fn test_hello_world() {
        let mut buf = [0u8; 15];
        assert_eq!(put_varstr(&mut buf, b"Hello World!"), 13);
        assert_eq!(
            buf,
            [0x0c, 0x48, 0x65, 0x6c, 0x6c, 0x6f, 0x20, 0x57, 0x6f, 0x72, 0x6c, 0x64, 0x21, 0x00, 0x00]
        );

        let (decoded, read) = decode_varstr(&buf).unwrap();
        assert_eq!(read, 13);
        assert_eq!(decoded, b"Hello World!");
    }

    #[test]
    #[should_panic(expected = "too small")]
    fn test_put_varstr_undersized_buffer_panics() {
        let mut buf = [0u8; 12];
        put_varstr(&mut buf, b"Hello World!");
    }

    #[test]
    fn test_put_varstr_panic_leaves_buffer_untouched() {
        let mut buf = [0x77u8; 4];
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            put_varstr(&mut buf, b"hello");
        }));
        assert!(result.is_err());
        assert_eq!(buf, [0x77; 4]);
    }

    #[test]
    fn test_try_put_varstr() {
        let mut buf = [0u8; 4];
        assert_eq!(
            try_put_varstr(&mut buf, b"hello"),
            Err(WireError::BufferTooSmall {
                required: 6,
                available: 4
            })
        );
        assert_eq!(buf, [0; 4]);
        assert_eq!(try_put_varstr(&mut buf, b"abc"), Ok(4));
        assert_eq!(buf, [0x03, b'a', b'b', b'c']);
    }

    #[test]
    fn test_decode_varstr_insufficient() {
        assert_eq!(decode_varstr(&[]), None);
        assert_eq!(decode_varstr(&[0xfd, 0x00]), None);
        assert_eq!(decode_varstr(&[0x02, 0xaa]), None);
        assert_eq!(decode_varstr(&[0xfd, 0x00, 0x01, 0xaa]), None);
    }

    #[test]
    fn test_decode_varstr_huge_announced_length() {
        assert_eq!(decode_varstr(&[0xff; 9]), None);
        assert_eq!(decode_varstr(&[0xff, 0xf8, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]), None);
    }

    #[test]
    fn test_read_varstr_truncated_payload() {
        let mut stream: &[u8] = &[0x05, b'h', b'e'];
        assert!(matches!(
            read_varstr(&mut stream),
            Err(WireError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn test_read_varstr_huge_announced_length_fails_without_allocating() {
        let mut stream: &[u8] = &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f, 0x01];
        assert!(matches!(
            read_varstr(&mut stream),
            Err(WireError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn test_read_varstr_limited() {
        let mut stream: &[u8] = b"\x05hello\x03abc";
        assert_eq!(read_varstr_limited(&mut stream, 5), Ok(b"hello".to_vec()));
        assert_eq!(
            read_varstr_limited(&mut stream, 2),
            Err(WireError::LengthLimitExceeded {
                length: 3,
                limit: 2
            })
        );
        // Payload left unread on rejection
        assert_eq!(stream, b"abc");
    }
}
