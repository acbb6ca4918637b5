//! Reward distributor: plans rounds against the elected set and keeps totals.

use crate::error::RewardError;
use crate::plan::{plan_distribution, RewardPlan};
use crate::pool::RewardPoolSource;
use autonomix_election::ValidatorSet;
use autonomix_staking::StakeLedger;
use autonomix_types::{Address, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

/// Reward configuration plus running totals.
///
/// Does not own stake records; credits are applied by the caller through
/// [`StakeLedger::credit_rewards`] once the tokens have moved.
#[derive(Clone, Debug)]
pub struct RewardDistributor {
    source: RewardPoolSource,
    fixed_pool: TokenAmount,
    rounds: u64,
    total_distributed: TokenAmount,
    total_claimed: TokenAmount,
    last_distribution: Option<Timestamp>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSnapshot {
    pub rounds: u64,
    pub total_distributed: TokenAmount,
    pub total_claimed: TokenAmount,
    pub last_distribution: Option<Timestamp>,
}

impl RewardDistributor {
    pub fn new(source: RewardPoolSource, fixed_pool: TokenAmount) -> Self {
        Self {
            source,
            fixed_pool,
            rounds: 0,
            total_distributed: TokenAmount::ZERO,
            total_claimed: TokenAmount::ZERO,
            last_distribution: None,
        }
    }

    pub fn restore(source: RewardPoolSource, fixed_pool: TokenAmount, snapshot: RewardSnapshot) -> Self {
        Self {
            rounds: snapshot.rounds,
            total_distributed: snapshot.total_distributed,
            total_claimed: snapshot.total_claimed,
            last_distribution: snapshot.last_distribution,
            ..Self::new(source, fixed_pool)
        }
    }

    pub fn snapshot(&self) -> RewardSnapshot {
        RewardSnapshot {
            rounds: self.rounds,
            total_distributed: self.total_distributed,
            total_claimed: self.total_claimed,
            last_distribution: self.last_distribution,
        }
    }

    /// Plan a round over `validators` using their current stake.
    ///
    /// `treasury_available` is the treasury balance capped by its allowance.
    pub fn plan(
        &self,
        validators: &ValidatorSet,
        ledger: &StakeLedger,
        treasury_available: TokenAmount,
    ) -> Result<RewardPlan, RewardError> {
        if validators.is_empty() {
            return Err(RewardError::EmptyValidatorSet);
        }
        let stakes: Vec<(Address, TokenAmount)> = validators
            .members()
            .iter()
            .map(|v| (v.address, ledger.delegate_total_staked(&v.address)))
            .collect();
        let pool = self.source.resolve(self.fixed_pool, treasury_available);
        plan_distribution(pool, &stakes)
    }

    /// Record a plan whose tokens have moved and whose credits were applied.
    pub fn record(&mut self, plan: &RewardPlan, now: Timestamp) {
        self.rounds += 1;
        self.total_distributed = self.total_distributed.saturating_add(plan.distributed);
        self.last_distribution = Some(now);
        tracing::info!(
            round = self.rounds,
            pool = %plan.pool,
            distributed = %plan.distributed,
            remainder = %plan.remainder,
            validators = plan.shares.len(),
            "rewards distributed"
        );
    }

    /// Unclaimed rewards of `delegate`, or `NothingToClaim`.
    pub fn claimable(&self, ledger: &StakeLedger, delegate: &Address) -> Result<TokenAmount, RewardError> {
        let amount = ledger
            .delegate(delegate)
            .map(|d| d.unclaimed_rewards())
            .unwrap_or(TokenAmount::ZERO);
        if amount.is_zero() {
            return Err(RewardError::NothingToClaim(*delegate));
        }
        Ok(amount)
    }

    pub fn record_claim(&mut self, delegate: &Address, amount: TokenAmount) {
        self.total_claimed = self.total_claimed.saturating_add(amount);
        tracing::info!(%delegate, %amount, "rewards claimed");
    }

    pub fn source(&self) -> RewardPoolSource {
        self.source
    }

    pub fn fixed_pool(&self) -> TokenAmount {
        self.fixed_pool
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn total_distributed(&self) -> TokenAmount {
        self.total_distributed
    }

    pub fn total_claimed(&self) -> TokenAmount {
        self.total_claimed
    }

    pub fn last_distribution(&self) -> Option<Timestamp> {
        self.last_distribution
    }
}
