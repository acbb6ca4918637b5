//! Token amount type for AUTOX.
//!
//! Amounts are fixed-point integers (u128) in base units to avoid floating-point errors.
//! One whole token is [`TOKEN_UNIT`] base units (18 decimals, as the ERC-20 deployment).

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;

/// Number of decimals of the staking token.
pub const TOKEN_DECIMALS: u8 = 18;

/// Base units in one whole token.
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// An amount of the staking token, in base units.
///
/// Human-readable formats get a decimal string because TOML and most JSON
/// consumers cannot carry full `u128` values; plain integers are accepted on
/// input. Binary formats carry the raw `u128`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole tokens to base units. Saturates at `u128::MAX`.
    pub fn from_tokens(tokens: u128) -> Self {
        Self(tokens.saturating_mul(TOKEN_UNIT))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Whole tokens, truncating the fractional part.
    pub fn whole_tokens(&self) -> u128 {
        self.0 / TOKEN_UNIT
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc.saturating_add(x))
    }
}

impl From<u128> for TokenAmount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.0.to_string())
        } else {
            serializer.serialize_u128(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(AmountVisitor)
        } else {
            u128::deserialize(deserializer).map(TokenAmount)
        }
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = TokenAmount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal string of base units")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(TokenAmount(v as u128))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(TokenAmount(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u128::try_from(v)
            .map(TokenAmount)
            .map_err(|_| E::custom(format!("token amount must be non-negative, got {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse::<u128>()
            .map(TokenAmount)
            .map_err(|e| E::custom(format!("invalid token amount {v:?}: {e}")))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / TOKEN_UNIT;
        let frac = self.0 % TOKEN_UNIT;
        if frac == 0 {
            write!(f, "{whole} AUTOX")
        } else {
            let digits = format!("{frac:018}");
            write!(f, "{whole}.{} AUTOX", digits.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_whole_and_fractional() {
        assert_eq!(TokenAmount::from_tokens(5).to_string(), "5 AUTOX");
        assert_eq!(
            TokenAmount::new(TOKEN_UNIT + TOKEN_UNIT / 2).to_string(),
            "1.5 AUTOX"
        );
        assert_eq!(TokenAmount::new(1).to_string(), "0.000000000000000001 AUTOX");
    }

    #[test]
    fn sum_saturates() {
        let total: TokenAmount = [TokenAmount::MAX, TokenAmount::new(1)].into_iter().sum();
        assert_eq!(total, TokenAmount::MAX);
    }

    #[test]
    fn serde_accepts_string_and_integer() {
        let big = TokenAmount::from_tokens(1000);
        let json = serde_json::to_string(&big).unwrap();
        assert_eq!(json, "\"1000000000000000000000\"");
        assert_eq!(serde_json::from_str::<TokenAmount>(&json).unwrap(), big);
        assert_eq!(
            serde_json::from_str::<TokenAmount>("42").unwrap(),
            TokenAmount::new(42)
        );
        assert!(serde_json::from_str::<TokenAmount>("-1").is_err());
    }

    #[test]
    fn checked_ops() {
        let a = TokenAmount::new(10);
        assert_eq!(a.checked_sub(TokenAmount::new(11)), None);
        assert_eq!(a.checked_add(TokenAmount::new(5)), Some(TokenAmount::new(15)));
        assert_eq!(TokenAmount::MAX.checked_add(a), None);
    }
}
