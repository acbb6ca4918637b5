//! The DPoS aggregate root.
//!
//! Every entry point follows the same shape: validate everything, perform at
//! most one token movement, then apply bookkeeping that cannot fail. A failed
//! call therefore leaves both the token ledger and the core untouched.

use autonomix_datashare::{DataMetadata, DataRecord, DataRegistry};
use autonomix_election::{ElectionEngine, ElectionResult};
use autonomix_rewards::{RewardDistributor, RewardPlan};
use autonomix_staking::{Delegate, StakeLedger, StakePosition};
use autonomix_token::TokenGateway;
use autonomix_types::{Address, DataHash, DposParams, Timestamp, TokenAmount};

use crate::access::{AccessPolicy, ElectionAccess};
use crate::config::NodeConfig;
use crate::event::DposEvent;
use crate::snapshot::{DposSnapshot, SNAPSHOT_VERSION};
use crate::DposError;

/// All core state, generic over the token backend.
pub struct DposState<G> {
    token: G,
    owner: Address,
    treasury: Address,
    custody: Address,
    params: DposParams,
    access: AccessPolicy,
    stakes: StakeLedger,
    election: ElectionEngine,
    rewards: RewardDistributor,
    data: DataRegistry,
}

impl<G: TokenGateway> DposState<G> {
    /// Fresh state; the election timer starts at `genesis`.
    pub fn new(token: G, config: &NodeConfig, genesis: Timestamp) -> Result<Self, DposError> {
        config.validate()?;
        Ok(Self {
            token,
            owner: config.owner,
            treasury: config.treasury,
            custody: config.custody,
            params: config.params.clone(),
            access: config.access_policy(),
            stakes: StakeLedger::new(),
            election: ElectionEngine::new(&config.params, genesis)?,
            rewards: RewardDistributor::new(config.reward_pool_source, config.params.reward_pool),
            data: DataRegistry::new(),
        })
    }

    /// Rebuild from a snapshot. Parameters and policies come from `config`.
    pub fn restore(token: G, config: &NodeConfig, snapshot: DposSnapshot) -> Result<Self, DposError> {
        config.validate()?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DposError::Snapshot(format!(
                "unsupported snapshot version {}, expected {SNAPSHOT_VERSION}",
                snapshot.version
            )));
        }
        let stakes = StakeLedger::restore(snapshot.stakes)?;
        let election = ElectionEngine::restore(&config.params, snapshot.election)?;
        let rewards = RewardDistributor::restore(
            config.reward_pool_source,
            config.params.reward_pool,
            snapshot.rewards,
        );
        let data = DataRegistry::restore(snapshot.data)?;
        for validator in election.validator_set().members() {
            if !stakes.contains(&validator.address) {
                return Err(DposError::Snapshot(format!(
                    "validator {} is not a known delegate",
                    validator.address
                )));
            }
        }
        Ok(Self {
            token,
            owner: config.owner,
            treasury: config.treasury,
            custody: config.custody,
            params: config.params.clone(),
            access: config.access_policy(),
            stakes,
            election,
            rewards,
            data,
        })
    }

    pub fn snapshot(&self, now: Timestamp) -> DposSnapshot {
        DposSnapshot {
            version: SNAPSHOT_VERSION,
            taken_at: now,
            stakes: self.stakes.snapshot(),
            election: self.election.snapshot(),
            rewards: self.rewards.snapshot(),
            data: self.data.snapshot(),
        }
    }

    // ── Staking ─────────────────────────────────────────────────────────

    /// Lock `amount` of the caller's tokens toward `delegate`.
    ///
    /// The caller must have approved the custody account beforehand.
    pub fn stake(
        &mut self,
        caller: Address,
        delegate: Address,
        amount: TokenAmount,
        now: Timestamp,
    ) -> Result<Vec<DposEvent>, DposError> {
        if caller.is_zero() {
            return Err(autonomix_staking::StakingError::ZeroAddress.into());
        }
        self.reject_custody(caller, "stake")?;
        self.reject_custody(delegate, "be a delegate")?;
        self.stakes.check_credit(&delegate, &caller, amount)?;
        if amount < self.params.min_stake {
            return Err(DposError::BelowMinimumStake {
                amount,
                minimum: self.params.min_stake,
            });
        }

        self.token
            .transfer_from(&self.custody, &caller, &self.custody, amount)?;
        let is_new = match self.stakes.credit(&delegate, &caller, amount, now) {
            Ok(is_new) => is_new,
            Err(e) => return Err(self.refund(caller, amount, e.into())),
        };

        let mut events = Vec::with_capacity(2);
        if is_new {
            events.push(DposEvent::CandidateRegistered { delegate });
        }
        events.push(DposEvent::Staked {
            delegate,
            delegator: caller,
            amount,
            delegate_total: self.stakes.delegate_total_staked(&delegate),
        });
        Ok(events)
    }

    /// Return `amount` of the caller's stake toward `delegate`.
    pub fn unstake(
        &mut self,
        caller: Address,
        delegate: Address,
        amount: TokenAmount,
        _now: Timestamp,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.reject_custody(caller, "unstake")?;
        self.stakes.check_debit(&delegate, &caller, amount)?;
        self.token.transfer(&self.custody, &caller, amount)?;
        self.stakes.debit(&delegate, &caller, amount)?;
        Ok(vec![DposEvent::Unstaked {
            delegate,
            delegator: caller,
            amount,
            delegate_total: self.stakes.delegate_total_staked(&delegate),
        }])
    }

    /// Register a zero-stake election candidate. Owner only.
    pub fn register_candidate(
        &mut self,
        caller: Address,
        delegate: Address,
        now: Timestamp,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.require_owner(caller, "register candidates")?;
        self.reject_custody(delegate, "be a delegate")?;
        let events = if self.stakes.register_candidate(&delegate, now)? {
            vec![DposEvent::CandidateRegistered { delegate }]
        } else {
            Vec::new()
        };
        Ok(events)
    }

    // ── Election ────────────────────────────────────────────────────────

    pub fn elect_validators(
        &mut self,
        caller: Address,
        now: Timestamp,
    ) -> Result<Vec<DposEvent>, DposError> {
        if self.access.election == ElectionAccess::OwnerOnly {
            self.require_owner(caller, "trigger elections")?;
        }
        let result: ElectionResult = self.election.elect(&self.stakes, now)?;
        Ok(vec![DposEvent::ValidatorsElected {
            round: result.round,
            validators: result.elected.addresses(),
            total_stake: result.total_elected_stake,
        }])
    }

    // ── Rewards ─────────────────────────────────────────────────────────

    /// Plan the next distribution without applying it.
    pub fn plan_rewards(&self) -> Result<RewardPlan, DposError> {
        let available = self
            .token
            .balance_of(&self.treasury)
            .min(self.token.allowance(&self.treasury, &self.custody));
        Ok(self
            .rewards
            .plan(self.election.validator_set(), &self.stakes, available)?)
    }

    /// Move one round of rewards from the treasury into custody and credit
    /// them to the elected validators. Owner only.
    pub fn distribute_rewards(
        &mut self,
        caller: Address,
        now: Timestamp,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.require_owner(caller, "distribute rewards")?;
        let plan = self.plan_rewards()?;
        let credits = plan.credits();
        self.stakes.check_reward_credits(&credits)?;

        if !plan.distributed.is_zero() {
            self.token
                .transfer_from(&self.custody, &self.treasury, &self.custody, plan.distributed)?;
        }
        if let Err(e) = self.stakes.credit_rewards(&credits) {
            let undo = self
                .token
                .transfer(&self.custody, &self.treasury, plan.distributed);
            return Err(compensation_failed(e.into(), undo.err()));
        }
        self.rewards.record(&plan, now);

        Ok(vec![DposEvent::RewardsDistributed {
            round: self.rewards.rounds(),
            pool: plan.pool,
            distributed: plan.distributed,
            remainder: plan.remainder,
            shares: plan.shares.iter().map(|s| (s.validator, s.reward)).collect(),
        }])
    }

    /// Pay out all of the caller's unclaimed rewards.
    pub fn claim_rewards(
        &mut self,
        caller: Address,
        _now: Timestamp,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.reject_custody(caller, "claim rewards")?;
        let amount = self.rewards.claimable(&self.stakes, &caller)?;
        self.stakes.check_claim(&caller, amount)?;
        self.token.transfer(&self.custody, &caller, amount)?;
        self.stakes.mark_claimed(&caller, amount)?;
        self.rewards.record_claim(&caller, amount);
        Ok(vec![DposEvent::RewardsClaimed {
            delegate: caller,
            amount,
        }])
    }

    // ── Data verification ───────────────────────────────────────────────

    pub fn submit_data(
        &mut self,
        caller: Address,
        data_hash: DataHash,
        metadata: DataMetadata,
        ipfs_hash: Option<String>,
        now: Timestamp,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.data.submit(data_hash, caller, metadata, ipfs_hash, now)?;
        Ok(vec![DposEvent::DataSubmitted {
            data_hash,
            submitter: caller,
        }])
    }

    /// Accept (`valid == true`) or reject a pending record.
    pub fn verify_data(
        &mut self,
        caller: Address,
        data_hash: DataHash,
        valid: bool,
        now: Timestamp,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.data.check_verify(&data_hash)?;
        self.data.check_verifier(
            self.access.verification,
            &caller,
            self.election.is_validator(&caller),
        )?;
        let record = self.data.verify(&data_hash, caller, valid, now)?;
        Ok(vec![DposEvent::DataVerified {
            data_hash,
            verifier: caller,
            status: record.status,
        }])
    }

    pub fn register_verifier(
        &mut self,
        caller: Address,
        verifier: Address,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.require_owner(caller, "register verifiers")?;
        let events = if self.data.register_verifier(verifier) {
            vec![DposEvent::VerifierRegistered { verifier }]
        } else {
            Vec::new()
        };
        Ok(events)
    }

    pub fn remove_verifier(
        &mut self,
        caller: Address,
        verifier: Address,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.require_owner(caller, "remove verifiers")?;
        let events = if self.data.remove_verifier(&verifier) {
            vec![DposEvent::VerifierRemoved { verifier }]
        } else {
            Vec::new()
        };
        Ok(events)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn current_validators(&self) -> Vec<Address> {
        self.election.current_validators()
    }

    pub fn delegate_total_staked(&self, delegate: &Address) -> TokenAmount {
        self.stakes.delegate_total_staked(delegate)
    }

    pub fn delegator_stake(&self, delegate: &Address, delegator: &Address) -> TokenAmount {
        self.stakes.delegator_stake(delegate, delegator)
    }

    pub fn delegate(&self, address: &Address) -> Option<&Delegate> {
        self.stakes.delegate(address)
    }

    pub fn delegators_of(&self, delegate: &Address) -> Vec<StakePosition> {
        self.stakes.delegators_of(delegate)
    }

    pub fn stakes_of(&self, delegator: &Address) -> Vec<StakePosition> {
        self.stakes.stakes_of(delegator)
    }

    pub fn data_record(&self, data_hash: &DataHash) -> Option<&DataRecord> {
        self.data.get(data_hash)
    }

    pub fn stake_ledger(&self) -> &StakeLedger {
        &self.stakes
    }

    pub fn election(&self) -> &ElectionEngine {
        &self.election
    }

    pub fn rewards(&self) -> &RewardDistributor {
        &self.rewards
    }

    pub fn data_registry(&self) -> &DataRegistry {
        &self.data
    }

    pub fn token(&self) -> &G {
        &self.token
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }

    pub fn custody(&self) -> Address {
        self.custody
    }

    pub fn params(&self) -> &DposParams {
        &self.params
    }

    pub fn access(&self) -> AccessPolicy {
        self.access
    }

    /// Check the stake ledger and that custody covers every stake and every
    /// unclaimed reward.
    pub fn audit(&self) -> Result<(), DposError> {
        self.stakes.audit()?;
        let owed = self
            .stakes
            .total_staked()
            .checked_add(self.stakes.total_unclaimed_rewards())
            .ok_or_else(|| DposError::Invariant("custody liabilities overflow".to_string()))?;
        let held = self.token.balance_of(&self.custody);
        if held < owed {
            return Err(DposError::Invariant(format!(
                "custody holds {held} but owes {owed}"
            )));
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn require_owner(&self, caller: Address, action: &'static str) -> Result<(), DposError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(DposError::Unauthorized { caller, action })
        }
    }

    /// Custody moving tokens to itself would credit stake or rewards with
    /// no tokens behind them.
    fn reject_custody(&self, account: Address, action: &'static str) -> Result<(), DposError> {
        if account == self.custody {
            Err(DposError::CustodyAccount { action })
        } else {
            Ok(())
        }
    }

    /// Send a just-received stake back after bookkeeping refused it.
    fn refund(&self, to: Address, amount: TokenAmount, cause: DposError) -> DposError {
        let undo = self.token.transfer(&self.custody, &to, amount);
        compensation_failed(cause, undo.err())
    }
}

fn compensation_failed(cause: DposError, undo: Option<autonomix_token::TokenError>) -> DposError {
    match undo {
        None => cause,
        Some(undo) => {
            tracing::error!(%cause, %undo, "compensating transfer failed");
            DposError::Invariant(format!("{cause}; compensating transfer failed: {undo}"))
        }
    }
}
