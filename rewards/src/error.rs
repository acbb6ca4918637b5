use autonomix_types::Address;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    #[error("no validators elected")]
    EmptyValidatorSet,

    #[error("elected validators hold no stake")]
    NoElectedStake,

    #[error("reward pool is empty")]
    EmptyPool,

    #[error("delegate {0} has no unclaimed rewards")]
    NothingToClaim(Address),

    #[error("reward arithmetic overflow")]
    Overflow,
}
