//! The elected validator set.

use autonomix_types::{Address, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

/// A delegate that won a seat, with the stake it held at election time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectedValidator {
    pub address: Address,
    pub stake_at_election: TokenAmount,
}

/// Currently elected validators, best ranked first.
///
/// Only ever replaced as a whole by the election engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSet {
    members: Vec<ElectedValidator>,
}

impl ValidatorSet {
    pub fn new(members: Vec<ElectedValidator>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[ElectedValidator] {
        &self.members
    }

    /// Validator addresses in rank order.
    pub fn addresses(&self) -> Vec<Address> {
        self.members.iter().map(|v| v.address).collect()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.members.iter().any(|v| v.address == *address)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Outcome of one successful election round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResult {
    /// 1 for the first election, incremented on each success.
    pub round: u64,
    pub elected: ValidatorSet,
    pub elected_at: Timestamp,
    /// Number of delegates ranked.
    pub candidates: usize,
    pub total_elected_stake: TokenAmount,
}
