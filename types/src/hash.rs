//! Content fingerprints for submitted data records.

use crate::error::TypesError;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

type Blake2b256 = Blake2b<U32>;

/// A 32-byte data fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DataHash([u8; 32]);

impl DataHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Blake2b-256 fingerprint of arbitrary content (e.g. an IPFS CID string).
    pub fn digest(content: &[u8]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(content);
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl FromStr for DataHash {
    type Err = TypesError;

    /// Parse 64 hex digits, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| TypesError::InvalidHash(format!("{s}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for DataHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for DataHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
