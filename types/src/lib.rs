//! Fundamental types for the Autonomix DPoS core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, token amounts, data fingerprints, timestamps, the clock
//! abstraction and the tunable election/reward parameters.

pub mod address;
pub mod amount;
pub mod clock;
pub mod error;
pub mod hash;
pub mod params;
pub mod time;

pub use address::Address;
pub use amount::{TokenAmount, TOKEN_DECIMALS, TOKEN_UNIT};
pub use clock::{Clock, SystemClock};
pub use error::TypesError;
pub use hash::DataHash;
pub use params::DposParams;
pub use time::Timestamp;
