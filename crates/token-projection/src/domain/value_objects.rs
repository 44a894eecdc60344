//! # Value Objects
//!
//! Immutable primitives shared by the whole projection.
//!
//! `Address` is the single normalized form of an account identifier. It is
//! parsed once at the boundary (event envelopes, fixtures, cache files) and
//! compared byte-wise afterwards, so two spellings of the same hex address can
//! never produce two entries in a keyed collection.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Re-export U256 from primitive-types for token amounts
pub use primitive_types::U256;

/// Error returned when a string is not a 20-byte hex address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressParseError {
    /// The string is not valid hex.
    #[error("invalid hex in address {0:?}")]
    InvalidHex(String),

    /// The decoded value is not 20 bytes long.
    #[error("address {input:?} has {len} bytes, expected 20")]
    InvalidLength {
        /// Original input
        input: String,
        /// Decoded byte length
        len: usize,
    },
}

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Address whose bytes are all `byte`. Handy for fixtures.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Canonical lower-case `0x`-prefixed hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(digits).map_err(|_| AddressParseError::InvalidHex(s.to_string()))?;
        let array: [u8; 20] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| AddressParseError::InvalidLength {
                    input: s.to_string(),
                    len: bytes.len(),
                })?;
        Ok(Self(array))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Serialized as a hex string so it can be used as a JSON map key.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Milliseconds per second; contract dates arrive in seconds.
pub const MILLIS_PER_SECOND: u64 = 1_000;

/// Converts an on-chain timestamp (seconds) to the internal epoch milliseconds.
///
/// Saturates instead of wrapping for absurd contract values.
#[must_use]
pub fn seconds_to_millis(seconds: u64) -> u64 {
    seconds.saturating_mul(MILLIS_PER_SECOND)
}
