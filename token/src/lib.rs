//! Token transfer gateway.
//!
//! The DPoS core never owns token balances itself. It moves stake and rewards
//! through an allowance-based fungible token (ERC-20 `approve`/`transferFrom`
//! semantics) abstracted behind [`TokenGateway`].
//!
//! [`TokenLedger`] is the in-memory implementation used for local deployments
//! and tests.

pub mod error;
pub mod gateway;
pub mod ledger;

pub use error::TokenError;
pub use gateway::TokenGateway;
pub use ledger::{TokenEvent, TokenLedger};
