use autonomix_types::{Address, TokenAmount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("insufficient allowance: {spender} may spend {available} of {owner}'s tokens, needs {needed}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("transfer to the zero address")]
    ZeroAddress,

    #[error("arithmetic overflow in token balance")]
    Overflow,

    #[error("token backend rejected the call: {0}")]
    Rejected(String),
}
