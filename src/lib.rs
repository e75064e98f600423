//! # blvm-wire
//!
//! Bitcoin peer-to-peer wire protocol primitives: the variable-length integer
//! (VarInt, a.k.a. CompactSize) and the variable-length byte string (VarStr).
//!
//! Higher-level message encoders use these for lengths, counts and
//! length-prefixed fields. This crate does no networking, framing or
//! checksumming of its own.
//!
//! ## Access patterns
//!
//! Each primitive can be:
//! - written into a caller-provided buffer (`put_*`), which panics if the
//!   buffer is too small since that is a caller bug
//! - decoded from a buffer (`decode_*`), returning `None` when the buffer
//!   does not yet hold a complete encoding
//! - read from a [`ByteSource`](serialization::ByteSource) one byte at a time
//!   (`read_*`), returning an error if the source fails or runs dry
//!
//! ## Usage
//!
//! ```rust
//! use blvm_wire::constants::MAX_VARINT_LEN_64;
//! use blvm_wire::serialization::{decode_varint, put_varint, read_varstr};
//!
//! let mut buf = [0u8; MAX_VARINT_LEN_64];
//! let written = put_varint(&mut buf, 1344);
//! assert_eq!(&buf[..written], &[0xfd, 0x40, 0x05]);
//! assert_eq!(decode_varint(&buf[..written]), Some((1344, 3)));
//!
//! let mut stream: &[u8] = b"\x0cHello World!";
//! assert_eq!(read_varstr(&mut stream).unwrap(), b"Hello World!");
//! ```
//!
//! All operations are pure functions of their arguments; there is no shared
//! state, so they can be called concurrently from any thread.

pub mod config;
pub mod constants;
pub mod error;
pub mod serialization;

pub use config::CodecConfig;
pub use error::{Result, WireError};
