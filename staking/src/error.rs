use autonomix_types::{Address, TokenAmount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("the zero address cannot be a delegate")]
    ZeroAddress,

    #[error("insufficient stake: {delegator} has {available} staked toward {delegate}, requested {requested}")]
    InsufficientStake {
        delegate: Address,
        delegator: Address,
        requested: TokenAmount,
        available: TokenAmount,
    },

    #[error("delegate {0} not found")]
    DelegateNotFound(Address),

    #[error("delegate {delegate} has only {available} unclaimed rewards, requested {requested}")]
    InsufficientRewards {
        delegate: Address,
        requested: TokenAmount,
        available: TokenAmount,
    },

    #[error("arithmetic overflow in stake accounting")]
    Overflow,

    #[error("stake ledger inconsistent: {0}")]
    Inconsistent(String),
}
