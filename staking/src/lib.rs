//! Stake ledger: pure bookkeeping of who staked what toward whom.
//!
//! Two views are kept in lockstep:
//! - per delegate: `total_staked`, reward counters and the delegator set;
//! - per (delegate, delegator): the amount that delegator locked.
//!
//! The invariant `Σ stake(d, *) == total_staked(d)` holds after every call.
//! Token movement is not this crate's concern; the caller validates with the
//! `check_*` methods, moves tokens, then applies the mutation.

pub mod delegate;
pub mod error;
pub mod ledger;

pub use delegate::{Delegate, StakePosition};
pub use error::StakingError;
pub use ledger::{StakeLedger, StakeLedgerSnapshot};
