//! Validator election.
//!
//! Every `election_period_secs` the delegates are ranked by total stake and
//! the top `max_validators` replace the validator set wholesale.
//!
//! ## Module overview
//!
//! - [`ranking`]: deterministic top-K selection (stake descending, address ascending).
//! - [`validator_set`]: the elected set and per-round results.
//! - [`engine`]: cooldown timer and set replacement.
//! - [`error`]: election error types.

pub mod engine;
pub mod error;
pub mod ranking;
pub mod validator_set;

pub use engine::{ElectionEngine, ElectionSnapshot};
pub use error::ElectionError;
pub use ranking::select_top;
pub use validator_set::{ElectedValidator, ElectionResult, ValidatorSet};
