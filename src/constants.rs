//! Wire format constants for Bitcoin varint (CompactSize) and varstr encoding

/// Encoded length of a varint carrying a value below 0xfd
pub const MAX_VARINT_LEN_8: usize = 1;

/// Maximum encoded length of a varint carrying a 16-bit value
pub const MAX_VARINT_LEN_16: usize = 3;

/// Maximum encoded length of a varint carrying a 32-bit value
pub const MAX_VARINT_LEN_32: usize = 5;

/// Maximum encoded length of any varint (64-bit value)
///
/// Size encode buffers with this when the value is not known in advance.
pub const MAX_VARINT_LEN_64: usize = 9;

/// Marker byte announcing a 2-byte little-endian value
pub const VARINT_MARKER_U16: u8 = 0xfd;

/// Marker byte announcing a 4-byte little-endian value
pub const VARINT_MARKER_U32: u8 = 0xfe;

/// Marker byte announcing an 8-byte little-endian value
pub const VARINT_MARKER_U64: u8 = 0xff;

/// Default upper bound on an announced varstr length: 32MB
///
/// Matches Bitcoin Core's MAX_SIZE, the largest length a peer may announce
/// for any serialized vector.
pub const DEFAULT_MAX_VARSTR_LENGTH: u64 = 0x0200_0000;

/// Largest payload allocation made ahead of bytes actually received
/// when reading a varstr from a stream (64KB)
pub const VARSTR_READ_CHUNK: usize = 64 * 1024;
