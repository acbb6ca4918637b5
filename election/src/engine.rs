//! Periodic validator election gated by a cooldown timer.

use crate::error::ElectionError;
use crate::ranking::select_top;
use crate::validator_set::{ElectedValidator, ElectionResult, ValidatorSet};
use autonomix_staking::StakeLedger;
use autonomix_types::{Address, DposParams, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Owns the validator set and the election timer.
#[derive(Clone, Debug)]
pub struct ElectionEngine {
    max_validators: usize,
    period_secs: u64,
    last_election: Timestamp,
    round: u64,
    validators: ValidatorSet,
}

/// Persisted engine state. Limits come from configuration on restore.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSnapshot {
    pub last_election: Timestamp,
    pub round: u64,
    pub validators: ValidatorSet,
}

impl ElectionEngine {
    /// Start the timer at `genesis`; the first election is due one period later.
    pub fn new(params: &DposParams, genesis: Timestamp) -> Result<Self, ElectionError> {
        if params.max_validators == 0 {
            return Err(ElectionError::InvalidLimit);
        }
        Ok(Self {
            max_validators: params.max_validators,
            period_secs: params.election_period_secs,
            last_election: genesis,
            round: 0,
            validators: ValidatorSet::default(),
        })
    }

    /// Rebuild from a snapshot. The set must fit the configured limit and
    /// name each validator once.
    pub fn restore(params: &DposParams, snapshot: ElectionSnapshot) -> Result<Self, ElectionError> {
        let mut engine = Self::new(params, snapshot.last_election)?;
        let size = snapshot.validators.len();
        if size > engine.max_validators {
            return Err(ElectionError::OversizedSet {
                size,
                max: engine.max_validators,
            });
        }
        let mut seen = HashSet::with_capacity(size);
        for member in snapshot.validators.members() {
            if !seen.insert(member.address) {
                return Err(ElectionError::DuplicateValidator(member.address));
            }
        }
        engine.round = snapshot.round;
        engine.validators = snapshot.validators;
        Ok(engine)
    }

    pub fn snapshot(&self) -> ElectionSnapshot {
        ElectionSnapshot {
            last_election: self.last_election,
            round: self.round,
            validators: self.validators.clone(),
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.last_election.has_expired(self.period_secs, now)
    }

    /// Reject unless the cooldown has elapsed at `now`.
    pub fn check_due(&self, now: Timestamp) -> Result<(), ElectionError> {
        if self.is_due(now) {
            Ok(())
        } else {
            Err(ElectionError::ElectionNotDue {
                now,
                next_due: self.next_election_due(),
            })
        }
    }

    /// Rank every registered delegate and replace the validator set.
    ///
    /// Zero delegates yield an empty set, not an error.
    pub fn elect(
        &mut self,
        ledger: &StakeLedger,
        now: Timestamp,
    ) -> Result<ElectionResult, ElectionError> {
        self.check_due(now)?;

        let candidates = ledger.delegate_count();
        let elected: Vec<ElectedValidator> = select_top(ledger.stake_table(), self.max_validators)
            .into_iter()
            .map(|(address, stake_at_election)| ElectedValidator {
                address,
                stake_at_election,
            })
            .collect();
        let total_elected_stake: TokenAmount =
            elected.iter().map(|v| v.stake_at_election).sum();

        self.validators = ValidatorSet::new(elected);
        self.last_election = now;
        self.round += 1;

        tracing::info!(
            round = self.round,
            candidates,
            elected = self.validators.len(),
            %total_elected_stake,
            "validators elected"
        );

        Ok(ElectionResult {
            round: self.round,
            elected: self.validators.clone(),
            elected_at: now,
            candidates,
            total_elected_stake,
        })
    }

    pub fn validator_set(&self) -> &ValidatorSet {
        &self.validators
    }

    pub fn current_validators(&self) -> Vec<Address> {
        self.validators.addresses()
    }

    pub fn is_validator(&self, address: &Address) -> bool {
        self.validators.contains(address)
    }

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Genesis until the first election succeeds.
    pub fn last_election(&self) -> Timestamp {
        self.last_election
    }

    pub fn next_election_due(&self) -> Timestamp {
        self.last_election.saturating_add_secs(self.period_secs)
    }

    pub fn seconds_until_due(&self, now: Timestamp) -> u64 {
        self.next_election_due().as_secs().saturating_sub(now.as_secs())
    }

    /// Number of successful elections so far.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn max_validators(&self) -> usize {
        self.max_validators
    }

    pub fn period_secs(&self) -> u64 {
        self.period_secs
    }
}
