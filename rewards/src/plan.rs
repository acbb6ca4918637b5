//! Pure reward computation.

use crate::error::RewardError;
use autonomix_types::{Address, TokenAmount};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// One validator's cut of a distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardShare {
    pub validator: Address,
    pub stake: TokenAmount,
    pub reward: TokenAmount,
}

/// A computed, not yet applied, distribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPlan {
    pub pool: TokenAmount,
    pub total_stake: TokenAmount,
    /// In validator-set order.
    pub shares: Vec<RewardShare>,
    /// Sum of all rewards; what leaves the treasury.
    pub distributed: TokenAmount,
    /// `pool - distributed`; stays in the treasury.
    pub remainder: TokenAmount,
}

impl RewardPlan {
    /// Non-zero `(validator, reward)` pairs for the stake ledger.
    pub fn credits(&self) -> Vec<(Address, TokenAmount)> {
        self.shares
            .iter()
            .filter(|s| !s.reward.is_zero())
            .map(|s| (s.validator, s.reward))
            .collect()
    }
}

/// Split `pool` over `stakes` proportionally, rounding each share down.
///
/// `pool * stake` can exceed `u128`, so the products are taken in
/// arbitrary precision. Each share is at most `pool`, so it fits back.
pub fn plan_distribution(
    pool: TokenAmount,
    stakes: &[(Address, TokenAmount)],
) -> Result<RewardPlan, RewardError> {
    if stakes.is_empty() {
        return Err(RewardError::EmptyValidatorSet);
    }
    if pool.is_zero() {
        return Err(RewardError::EmptyPool);
    }
    let total_stake = stakes
        .iter()
        .try_fold(TokenAmount::ZERO, |acc, (_, s)| acc.checked_add(*s))
        .ok_or(RewardError::Overflow)?;
    if total_stake.is_zero() {
        return Err(RewardError::NoElectedStake);
    }

    let pool_big = BigUint::from(pool.raw());
    let total_big = BigUint::from(total_stake.raw());
    let mut shares = Vec::with_capacity(stakes.len());
    let mut distributed = TokenAmount::ZERO;
    for (validator, stake) in stakes {
        let reward = (&pool_big * BigUint::from(stake.raw())) / &total_big;
        let reward = u128::try_from(reward)
            .map(TokenAmount::new)
            .map_err(|_| RewardError::Overflow)?;
        distributed = distributed
            .checked_add(reward)
            .ok_or(RewardError::Overflow)?;
        shares.push(RewardShare {
            validator: *validator,
            stake: *stake,
            reward,
        });
    }
    let remainder = pool.checked_sub(distributed).ok_or(RewardError::Overflow)?;

    Ok(RewardPlan {
        pool,
        total_stake,
        shares,
        distributed,
        remainder,
    })
}
