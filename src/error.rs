//! Error types for wire encoding and decoding

use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum WireError {
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(Cow<'static, str>),

    #[error("I/O error: {0}")]
    Io(Cow<'static, str>),

    #[error("Insufficient bytes: {0}")]
    InsufficientBytes(Cow<'static, str>),

    #[error("Non-canonical encoding: {0}")]
    NonCanonical(Cow<'static, str>),

    #[error("Varstr length {length} exceeds limit {limit}")]
    LengthLimitExceeded { length: u64, limit: u64 },

    #[error("Buffer too small: {required} bytes required, {available} available")]
    BufferTooSmall { required: usize, available: usize },
}

impl From<std::io::Error> for WireError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                WireError::UnexpectedEof(Cow::Owned(err.to_string()))
            }
            _ => WireError::Io(Cow::Owned(err.to_string())),
        }
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
