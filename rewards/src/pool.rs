use autonomix_types::TokenAmount;
use serde::{Deserialize, Serialize};

/// Where the per-distribution reward pool comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardPoolSource {
    /// `DposParams::reward_pool` every round.
    #[default]
    Fixed,
    /// Whatever the treasury currently makes available to the core.
    TreasuryBalance,
}

impl RewardPoolSource {
    /// Pool size for one round.
    ///
    /// `treasury_available` is the treasury balance capped by its allowance to
    /// the core. A fixed pool larger than that is returned as is and fails at
    /// transfer time.
    pub fn resolve(&self, fixed_pool: TokenAmount, treasury_available: TokenAmount) -> TokenAmount {
        match self {
            Self::Fixed => fixed_pool,
            Self::TreasuryBalance => treasury_available,
        }
    }
}
