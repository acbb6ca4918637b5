//! Account address type with `0x` prefix.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account address, rendered as `0x` followed by 40 lowercase hex digits.
///
/// Ordering is byte order, which is the same as ascending hex order. The
/// election engine relies on this to break ties between equal stakes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The standard prefix for all rendered addresses.
    pub const PREFIX: &'static str = "0x";

    /// The all-zero address. Never a valid staker or delegate.
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build a deterministic address whose last byte is `n`. Handy for tests and fixtures.
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| TypesError::InvalidAddress(format!("{s}: missing 0x prefix")))?;
        if body.len() != 40 {
            return Err(TypesError::InvalidAddress(format!(
                "{s}: expected 40 hex digits, got {}",
                body.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| TypesError::InvalidAddress(format!("{s}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}{})", Self::PREFIX, hex::encode(&self.0[16..]))
    }
}
