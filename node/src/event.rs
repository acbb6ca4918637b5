//! Events emitted by successful entry points, for off-chain subscribers.

use autonomix_types::{Address, DataHash, TokenAmount};
use autonomix_datashare::DataStatus;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DposEvent {
    /// A delegator locked tokens toward a delegate.
    Staked {
        delegate: Address,
        delegator: Address,
        amount: TokenAmount,
        delegate_total: TokenAmount,
    },
    Unstaked {
        delegate: Address,
        delegator: Address,
        amount: TokenAmount,
        delegate_total: TokenAmount,
    },
    /// First appearance of a delegate, by stake or explicit registration.
    CandidateRegistered { delegate: Address },
    ValidatorsElected {
        round: u64,
        validators: Vec<Address>,
        total_stake: TokenAmount,
    },
    RewardsDistributed {
        round: u64,
        pool: TokenAmount,
        distributed: TokenAmount,
        remainder: TokenAmount,
        shares: Vec<(Address, TokenAmount)>,
    },
    RewardsClaimed {
        delegate: Address,
        amount: TokenAmount,
    },
    DataSubmitted {
        data_hash: DataHash,
        submitter: Address,
    },
    /// The `(data_hash, success)` outcome of a verification.
    DataVerified {
        data_hash: DataHash,
        verifier: Address,
        status: DataStatus,
    },
    VerifierRegistered { verifier: Address },
    VerifierRemoved { verifier: Address },
}

impl DposEvent {
    /// Short name, used as a metrics and log label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Staked { .. } => "staked",
            Self::Unstaked { .. } => "unstaked",
            Self::CandidateRegistered { .. } => "candidate_registered",
            Self::ValidatorsElected { .. } => "validators_elected",
            Self::RewardsDistributed { .. } => "rewards_distributed",
            Self::RewardsClaimed { .. } => "rewards_claimed",
            Self::DataSubmitted { .. } => "data_submitted",
            Self::DataVerified { .. } => "data_verified",
            Self::VerifierRegistered { .. } => "verifier_registered",
            Self::VerifierRemoved { .. } => "verifier_removed",
        }
    }
}
