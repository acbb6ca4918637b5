//! Binary snapshots of the core state.
//!
//! The token ledger is external and not included; restoring requires the
//! same token backend the snapshot was taken against.

use autonomix_datashare::DataRegistrySnapshot;
use autonomix_election::ElectionSnapshot;
use autonomix_rewards::RewardSnapshot;
use autonomix_staking::StakeLedgerSnapshot;
use autonomix_types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::DposError;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DposSnapshot {
    pub version: u32,
    pub taken_at: Timestamp,
    pub stakes: StakeLedgerSnapshot,
    pub election: ElectionSnapshot,
    pub rewards: RewardSnapshot,
    pub data: DataRegistrySnapshot,
}

impl DposSnapshot {
    /// Serialize with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DposError> {
        bincode::serialize(self).map_err(|e| DposError::Snapshot(e.to_string()))
    }

    /// Deserialize with bincode. Garbage input is an error, never a panic.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DposError> {
        bincode::deserialize(bytes).map_err(|e| DposError::Snapshot(e.to_string()))
    }
}
