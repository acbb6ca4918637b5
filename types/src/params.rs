//! Election and reward parameters.

use crate::amount::TokenAmount;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the DPoS core.
///
/// Loaded from the node configuration; every field has a serde default so a
/// partial `[params]` table is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DposParams {
    /// Maximum size of the elected validator set.
    #[serde(default = "default_max_validators")]
    pub max_validators: usize,

    /// Minimum seconds between two successful elections.
    /// Default: 7 days = 604800 seconds.
    #[serde(default = "default_election_period_secs")]
    pub election_period_secs: u64,

    /// Reward pool (base units) handed out per distribution when the pool
    /// source is fixed. Default: 1000 tokens.
    #[serde(default = "default_reward_pool")]
    pub reward_pool: TokenAmount,

    /// Smallest amount accepted by a single `stake` call.
    #[serde(default = "default_min_stake")]
    pub min_stake: TokenAmount,
}

fn default_max_validators() -> usize {
    DposParams::MAX_VALIDATORS
}

fn default_election_period_secs() -> u64 {
    DposParams::ELECTION_PERIOD_SECS
}

fn default_reward_pool() -> TokenAmount {
    TokenAmount::from_tokens(1000)
}

fn default_min_stake() -> TokenAmount {
    TokenAmount::new(1)
}

impl DposParams {
    pub const MAX_VALIDATORS: usize = 21;
    pub const ELECTION_PERIOD_SECS: u64 = 7 * 24 * 3600;

    /// Reject parameter sets the engines cannot operate with.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.max_validators == 0 {
            return Err(TypesError::InvalidParam {
                name: "max_validators",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.election_period_secs == 0 {
            return Err(TypesError::InvalidParam {
                name: "election_period_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.min_stake.is_zero() {
            return Err(TypesError::InvalidParam {
                name: "min_stake",
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for DposParams {
    fn default() -> Self {
        Self {
            max_validators: default_max_validators(),
            election_period_secs: default_election_period_secs(),
            reward_pool: default_reward_pool(),
            min_stake: default_min_stake(),
        }
    }
}
