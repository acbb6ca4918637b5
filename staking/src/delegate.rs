//! Delegate records.

use autonomix_types::{Address, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A candidate for validator election and the stake pointed at it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegate {
    pub address: Address,
    /// Sum of every delegator's stake toward this delegate.
    pub total_staked: TokenAmount,
    /// Lifetime rewards credited by distributions.
    pub total_rewards: TokenAmount,
    /// Portion of `total_rewards` already paid out.
    pub claimed_rewards: TokenAmount,
    pub registered_at: Timestamp,
    /// Delegators with a non-zero stake toward this delegate.
    pub delegators: BTreeSet<Address>,
}

impl Delegate {
    pub fn new(address: Address, registered_at: Timestamp) -> Self {
        Self {
            address,
            total_staked: TokenAmount::ZERO,
            total_rewards: TokenAmount::ZERO,
            claimed_rewards: TokenAmount::ZERO,
            registered_at,
            delegators: BTreeSet::new(),
        }
    }

    /// Rewards credited but not yet claimed.
    pub fn unclaimed_rewards(&self) -> TokenAmount {
        self.total_rewards.saturating_sub(self.claimed_rewards)
    }
}

/// One delegator's stake toward one delegate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePosition {
    pub delegate: Address,
    pub delegator: Address,
    pub amount: TokenAmount,
}
