//! Torrent identifiers assigned by the engine.

use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Byte length of a torrent info-hash.
pub const INFO_HASH_LEN: usize = 20;

const HEX_LEN: usize = INFO_HASH_LEN * 2;

/// Engine-assigned identifier for a single torrent.
///
/// The hash is fixed at torrent creation and never changes for the life of
/// the torrent, which makes it the stable row key for the transfer list.
/// Rendered and parsed as 40 lowercase hexadecimal characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; INFO_HASH_LEN]);

impl InfoHash {
    /// Wrap raw hash bytes.
    #[must_use]
    pub const fn new(bytes: [u8; INFO_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw hash bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; INFO_HASH_LEN] {
        &self.0
    }
}

impl Display for InfoHash {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&hex::encode(self.0))
    }
}

impl Debug for InfoHash {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "InfoHash({self})")
    }
}

impl FromStr for InfoHash {
    type Err = ParseInfoHashError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.len() != HEX_LEN {
            return Err(ParseInfoHashError::InvalidLength {
                length: input.len(),
            });
        }
        let mut bytes = [0_u8; INFO_HASH_LEN];
        hex::decode_to_slice(input, &mut bytes)
            .map_err(|_| ParseInfoHashError::InvalidEncoding)?;
        Ok(Self(bytes))
    }
}

impl Serialize for InfoHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InfoHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

/// Error produced when parsing an [`InfoHash`] from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseInfoHashError {
    /// Input was not exactly 40 characters long.
    InvalidLength {
        /// Number of characters supplied.
        length: usize,
    },
    /// Input contained a non-hexadecimal character.
    InvalidEncoding,
}

impl Display for ParseInfoHashError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { length } => {
                write!(formatter, "expected {HEX_LEN} hex characters, got {length}")
            }
            Self::InvalidEncoding => formatter.write_str("invalid hex character"),
        }
    }
}

impl std::error::Error for ParseInfoHashError {}
