//! Reward distribution to the elected validator set.
//!
//! A distribution is computed as a pure [`RewardPlan`] first: each validator
//! receives `floor(pool * stake / total_elected_stake)`. The caller moves the
//! exact planned sum from the treasury in one transfer and only then credits
//! the plan to the stake ledger. Rounding dust never leaves the treasury.

pub mod distributor;
pub mod error;
pub mod plan;
pub mod pool;

pub use distributor::{RewardDistributor, RewardSnapshot};
pub use error::RewardError;
pub use plan::{plan_distribution, RewardPlan, RewardShare};
pub use pool::RewardPoolSource;
