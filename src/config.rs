//! Configuration for blvm-wire
//!
//! Decoding policy for callers reading untrusted peer data: how long a
//! varstr may be, and whether non-canonical varints are accepted. Settings
//! can be deserialized from a config file, loaded from environment
//! variables, or built programmatically. There is no global instance; pass
//! the config to where it is used.

use crate::constants::DEFAULT_MAX_VARSTR_LENGTH;
use crate::error::Result;
use crate::serialization::source::ByteSource;
use crate::serialization::varint::{self, check_canonical, read_varint_sized};
use crate::serialization::varstr::read_varstr_checked;
use serde::{Deserialize, Serialize};

/// Codec decoding policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Largest varstr length accepted by [`CodecConfig::read_varstr`]
    /// Default: 32MB (Bitcoin Core's MAX_SIZE)
    #[serde(default = "default_max_varstr_length")]
    pub max_varstr_length: u64,

    /// Reject varints encoded with a longer marker than their value needs
    /// Default: false (accept any well-formed encoding)
    #[serde(default)]
    pub require_canonical: bool,
}

fn default_max_varstr_length() -> u64 {
    DEFAULT_MAX_VARSTR_LENGTH
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_varstr_length: DEFAULT_MAX_VARSTR_LENGTH,
            require_canonical: false,
        }
    }
}

impl CodecConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables leave the default in place:
    /// - `BLVM_WIRE_MAX_VARSTR_LENGTH=1048576`
    /// - `BLVM_WIRE_REQUIRE_CANONICAL=true`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("BLVM_WIRE_MAX_VARSTR_LENGTH") {
            if let Ok(limit) = val.parse::<u64>() {
                config.max_varstr_length = limit;
            }
        }
        if let Ok(val) = std::env::var("BLVM_WIRE_REQUIRE_CANONICAL") {
            if let Ok(enabled) = val.parse::<bool>() {
                config.require_canonical = enabled;
            }
        }

        config
    }

    /// Decode a varint from a buffer under this policy
    ///
    /// `Ok(None)` is the "not enough data yet" outcome of
    /// [`decode_varint`](crate::serialization::varint::decode_varint).
    ///
    /// # Errors
    ///
    /// Returns `WireError::NonCanonical` when `require_canonical` is set and
    /// the encoding is longer than necessary.
    pub fn decode_varint(&self, buf: &[u8]) -> Result<Option<(u64, usize)>> {
        match varint::decode_varint(buf) {
            Some((value, consumed)) if self.require_canonical => {
                check_canonical(value, consumed)?;
                Ok(Some((value, consumed)))
            }
            decoded => Ok(decoded),
        }
    }

    /// Read a varint from a byte source under this policy
    ///
    /// # Errors
    ///
    /// Propagates source failures; returns `WireError::NonCanonical` as
    /// [`CodecConfig::decode_varint`] does.
    pub fn read_varint<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<u64> {
        let (value, consumed) = read_varint_sized(source)?;
        if self.require_canonical {
            check_canonical(value, consumed)?;
        }
        Ok(value)
    }

    /// Read a varstr from a byte source under this policy
    ///
    /// # Errors
    ///
    /// Returns `WireError::LengthLimitExceeded` if the announced length is
    /// above `max_varstr_length`, `WireError::NonCanonical` for a
    /// non-canonical length prefix when `require_canonical` is set, and
    /// propagates source failures.
    pub fn read_varstr<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<Vec<u8>> {
        read_varstr_checked(source, self.max_varstr_length, self.require_canonical)
    }
}
