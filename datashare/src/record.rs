use crate::metadata::DataMetadata;
use autonomix_types::{Address, DataHash, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verification outcome. `Pending` is the only non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataStatus {
    Pending,
    Verified,
    Rejected,
}

impl DataStatus {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for DataStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Verified => write!(f, "verified"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A submitted data fingerprint and its verification state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRecord {
    pub data_hash: DataHash,
    /// The submitting vehicle (car address).
    pub submitter: Address,
    pub metadata: DataMetadata,
    /// Off-chain content locator. Stored, never resolved.
    pub ipfs_hash: Option<String>,
    pub submitted_at: Timestamp,
    pub status: DataStatus,
    pub verified_by: Option<Address>,
    pub verified_at: Option<Timestamp>,
}
