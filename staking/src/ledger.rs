//! The stake ledger.

use crate::delegate::{Delegate, StakePosition};
use crate::error::StakingError;
use autonomix_types::{Address, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Per-delegate and per-(delegate, delegator) stake balances.
///
/// Delegates are kept in a `BTreeMap` so every enumeration is in ascending
/// address order, independent of insertion history.
#[derive(Debug, Default)]
pub struct StakeLedger {
    delegates: BTreeMap<Address, Delegate>,
    /// (delegate, delegator) → amount. Zero entries are removed.
    stakes: HashMap<(Address, Address), TokenAmount>,
    /// Reverse index: delegator → delegates it has a stake in.
    by_delegator: HashMap<Address, BTreeSet<Address>>,
    /// Sum of all stakes across the ledger.
    total_staked: TokenAmount,
}

impl StakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Register a delegate with zero stake so it takes part in elections.
    ///
    /// Returns `false` if the delegate was already known.
    pub fn register_candidate(
        &mut self,
        delegate: &Address,
        now: Timestamp,
    ) -> Result<bool, StakingError> {
        if delegate.is_zero() {
            return Err(StakingError::ZeroAddress);
        }
        if self.delegates.contains_key(delegate) {
            return Ok(false);
        }
        self.delegates.insert(*delegate, Delegate::new(*delegate, now));
        tracing::debug!(%delegate, "candidate registered");
        Ok(true)
    }

    /// Validate that `credit(delegate, delegator, amount)` would succeed.
    pub fn check_credit(
        &self,
        delegate: &Address,
        delegator: &Address,
        amount: TokenAmount,
    ) -> Result<(), StakingError> {
        if amount.is_zero() {
            return Err(StakingError::ZeroAmount);
        }
        if delegate.is_zero() {
            return Err(StakingError::ZeroAddress);
        }
        self.total_staked
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        self.delegate_total_staked(delegate)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        self.delegator_stake(delegate, delegator)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        Ok(())
    }

    /// Add `amount` to both the delegate total and the delegator entry.
    ///
    /// Registers the delegate on first stake. Returns `true` if the delegate was new.
    pub fn credit(
        &mut self,
        delegate: &Address,
        delegator: &Address,
        amount: TokenAmount,
        now: Timestamp,
    ) -> Result<bool, StakingError> {
        self.check_credit(delegate, delegator, amount)?;

        let is_new = !self.delegates.contains_key(delegate);
        let record = self
            .delegates
            .entry(*delegate)
            .or_insert_with(|| Delegate::new(*delegate, now));
        record.total_staked = record.total_staked.saturating_add(amount);
        record.delegators.insert(*delegator);

        let entry = self
            .stakes
            .entry((*delegate, *delegator))
            .or_insert(TokenAmount::ZERO);
        *entry = entry.saturating_add(amount);
        self.by_delegator
            .entry(*delegator)
            .or_default()
            .insert(*delegate);
        self.total_staked = self.total_staked.saturating_add(amount);

        tracing::debug!(%delegate, %delegator, %amount, "stake credited");
        Ok(is_new)
    }

    /// Validate that `debit(delegate, delegator, amount)` would succeed.
    pub fn check_debit(
        &self,
        delegate: &Address,
        delegator: &Address,
        amount: TokenAmount,
    ) -> Result<(), StakingError> {
        if amount.is_zero() {
            return Err(StakingError::ZeroAmount);
        }
        let available = self.delegator_stake(delegate, delegator);
        if available < amount {
            return Err(StakingError::InsufficientStake {
                delegate: *delegate,
                delegator: *delegator,
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Remove `amount` from both the delegate total and the delegator entry.
    ///
    /// A delegator entry that reaches zero is dropped; the delegate stays registered.
    pub fn debit(
        &mut self,
        delegate: &Address,
        delegator: &Address,
        amount: TokenAmount,
    ) -> Result<(), StakingError> {
        self.check_debit(delegate, delegator, amount)?;

        let key = (*delegate, *delegator);
        let remaining = self
            .stakes
            .get(&key)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
            .saturating_sub(amount);
        if remaining.is_zero() {
            self.stakes.remove(&key);
            if let Some(set) = self.by_delegator.get_mut(delegator) {
                set.remove(delegate);
                if set.is_empty() {
                    self.by_delegator.remove(delegator);
                }
            }
        } else {
            self.stakes.insert(key, remaining);
        }

        if let Some(record) = self.delegates.get_mut(delegate) {
            record.total_staked = record.total_staked.saturating_sub(amount);
            if remaining.is_zero() {
                record.delegators.remove(delegator);
            }
        }
        self.total_staked = self.total_staked.saturating_sub(amount);

        tracing::debug!(%delegate, %delegator, %amount, "stake debited");
        Ok(())
    }

    /// Validate a batch of reward credits without applying any of them.
    pub fn check_reward_credits(
        &self,
        credits: &[(Address, TokenAmount)],
    ) -> Result<(), StakingError> {
        let mut pending: HashMap<Address, TokenAmount> = HashMap::new();
        for (delegate, amount) in credits {
            let record = self
                .delegates
                .get(delegate)
                .ok_or(StakingError::DelegateNotFound(*delegate))?;
            let so_far = pending.entry(*delegate).or_insert(record.total_rewards);
            *so_far = so_far.checked_add(*amount).ok_or(StakingError::Overflow)?;
        }
        Ok(())
    }

    /// Credit rewards to several delegates; either all credits apply or none.
    pub fn credit_rewards(&mut self, credits: &[(Address, TokenAmount)]) -> Result<(), StakingError> {
        self.check_reward_credits(credits)?;
        for (delegate, amount) in credits {
            if let Some(record) = self.delegates.get_mut(delegate) {
                record.total_rewards = record.total_rewards.saturating_add(*amount);
            }
        }
        Ok(())
    }

    /// Validate that `amount` of a delegate's unclaimed rewards can be paid out.
    pub fn check_claim(&self, delegate: &Address, amount: TokenAmount) -> Result<(), StakingError> {
        let record = self
            .delegates
            .get(delegate)
            .ok_or(StakingError::DelegateNotFound(*delegate))?;
        let available = record.unclaimed_rewards();
        if available < amount {
            return Err(StakingError::InsufficientRewards {
                delegate: *delegate,
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Record that `amount` of a delegate's rewards was paid out.
    pub fn mark_claimed(&mut self, delegate: &Address, amount: TokenAmount) -> Result<(), StakingError> {
        self.check_claim(delegate, amount)?;
        if let Some(record) = self.delegates.get_mut(delegate) {
            record.claimed_rewards = record.claimed_rewards.saturating_add(amount);
        }
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Total stake toward a delegate. Zero for unknown delegates.
    pub fn delegate_total_staked(&self, delegate: &Address) -> TokenAmount {
        self.delegates
            .get(delegate)
            .map(|d| d.total_staked)
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Stake one delegator has toward one delegate. Zero if none.
    pub fn delegator_stake(&self, delegate: &Address, delegator: &Address) -> TokenAmount {
        self.stakes
            .get(&(*delegate, *delegator))
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    pub fn delegate(&self, address: &Address) -> Option<&Delegate> {
        self.delegates.get(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.delegates.contains_key(address)
    }

    /// All known delegates in ascending address order.
    pub fn delegates(&self) -> impl Iterator<Item = &Delegate> {
        self.delegates.values()
    }

    /// `(address, total_staked)` for every known delegate, ascending address order.
    pub fn stake_table(&self) -> impl Iterator<Item = (Address, TokenAmount)> + '_ {
        self.delegates.values().map(|d| (d.address, d.total_staked))
    }

    /// Delegators with a non-zero stake toward `delegate`, ascending address order.
    pub fn delegators_of(&self, delegate: &Address) -> Vec<StakePosition> {
        self.delegates
            .get(delegate)
            .map(|d| {
                d.delegators
                    .iter()
                    .map(|delegator| StakePosition {
                        delegate: *delegate,
                        delegator: *delegator,
                        amount: self.delegator_stake(delegate, delegator),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every position held by `delegator`, ascending delegate order.
    pub fn stakes_of(&self, delegator: &Address) -> Vec<StakePosition> {
        self.by_delegator
            .get(delegator)
            .map(|delegates| {
                delegates
                    .iter()
                    .map(|delegate| StakePosition {
                        delegate: *delegate,
                        delegator: *delegator,
                        amount: self.delegator_stake(delegate, delegator),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sum of all stakes in the ledger.
    pub fn total_staked(&self) -> TokenAmount {
        self.total_staked
    }

    /// Sum of rewards credited but not yet claimed, across all delegates.
    pub fn total_unclaimed_rewards(&self) -> TokenAmount {
        self.delegates.values().map(|d| d.unclaimed_rewards()).sum()
    }

    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }

    /// Recompute every aggregate from the individual entries and compare.
    pub fn audit(&self) -> Result<(), StakingError> {
        let mut per_delegate: HashMap<Address, u128> = HashMap::new();
        let mut grand_total: u128 = 0;
        for ((delegate, delegator), amount) in &self.stakes {
            if amount.is_zero() {
                return Err(StakingError::Inconsistent(format!(
                    "zero entry kept for ({delegate}, {delegator})"
                )));
            }
            let record = self.delegates.get(delegate).ok_or_else(|| {
                StakingError::Inconsistent(format!("stake toward unknown delegate {delegate}"))
            })?;
            if !record.delegators.contains(delegator) {
                return Err(StakingError::Inconsistent(format!(
                    "{delegator} missing from delegator set of {delegate}"
                )));
            }
            let sum = per_delegate.entry(*delegate).or_insert(0);
            *sum = sum.checked_add(amount.raw()).ok_or(StakingError::Overflow)?;
            grand_total = grand_total
                .checked_add(amount.raw())
                .ok_or(StakingError::Overflow)?;
        }
        for record in self.delegates.values() {
            if record.claimed_rewards > record.total_rewards {
                return Err(StakingError::Inconsistent(format!(
                    "{}: claimed {} exceeds credited {}",
                    record.address, record.claimed_rewards, record.total_rewards
                )));
            }
            if let Some(delegator) = record
                .delegators
                .iter()
                .find(|delegator| !self.stakes.contains_key(&(record.address, **delegator)))
            {
                return Err(StakingError::Inconsistent(format!(
                    "{delegator} listed by {} without a stake entry",
                    record.address
                )));
            }
            let sum = per_delegate.get(&record.address).copied().unwrap_or(0);
            if sum != record.total_staked.raw() {
                return Err(StakingError::Inconsistent(format!(
                    "{}: delegator entries sum to {sum}, total_staked is {}",
                    record.address,
                    record.total_staked.raw()
                )));
            }
        }
        if grand_total != self.total_staked.raw() {
            return Err(StakingError::Inconsistent(format!(
                "entries sum to {grand_total}, ledger total is {}",
                self.total_staked.raw()
            )));
        }
        Ok(())
    }
}

/// Serializable form of the ledger; the reverse index is rebuilt on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeLedgerSnapshot {
    pub delegates: Vec<Delegate>,
    pub stakes: Vec<StakePosition>,
}

impl StakeLedger {
    pub fn snapshot(&self) -> StakeLedgerSnapshot {
        let mut stakes: Vec<StakePosition> = self
            .stakes
            .iter()
            .map(|((delegate, delegator), amount)| StakePosition {
                delegate: *delegate,
                delegator: *delegator,
                amount: *amount,
            })
            .collect();
        stakes.sort_by_key(|p| (p.delegate, p.delegator));
        StakeLedgerSnapshot {
            delegates: self.delegates.values().cloned().collect(),
            stakes,
        }
    }

    /// Rebuild a ledger from a snapshot, re-deriving totals and indexes.
    ///
    /// Fails if the snapshot violates the stake-sum invariant.
    pub fn restore(snapshot: StakeLedgerSnapshot) -> Result<Self, StakingError> {
        let mut ledger = Self::new();
        for record in snapshot.delegates {
            ledger.delegates.insert(record.address, record);
        }
        for position in snapshot.stakes {
            if position.amount.is_zero() {
                continue;
            }
            ledger
                .stakes
                .insert((position.delegate, position.delegator), position.amount);
            ledger
                .by_delegator
                .entry(position.delegator)
                .or_default()
                .insert(position.delegate);
            ledger.total_staked = ledger
                .total_staked
                .checked_add(position.amount)
                .ok_or(StakingError::Overflow)?;
        }
        ledger.audit()?;
        Ok(ledger)
    }
}
