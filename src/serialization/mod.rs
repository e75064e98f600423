//! Bitcoin wire format primitives
//!
//! VarInt and VarStr encoding as used by Bitcoin peer-to-peer messages.
//! Higher-level message encoders combine these to build full payloads.
//!
//! All multi-byte integers use little-endian byte order (Bitcoin standard).

pub mod source;
pub mod varint;
pub mod varstr;

pub use source::ByteSource;
pub use varint::{
    decode_varint, decode_varint_strict, encode_varint, put_varint, read_varint,
    read_varint_sized, try_put_varint,
    varint_len, varint_prefix_len,
};
pub use varstr::{
    decode_varstr, encode_varstr, put_varstr, read_varstr, read_varstr_limited, try_put_varstr,
    varstr_len,
};
