//! Access control for the permissioned entry points.

use autonomix_datashare::VerifierPolicy;
use serde::{Deserialize, Serialize};

/// Who may trigger an election.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionAccess {
    /// Any caller, e.g. a keeper bot. The cooldown is the only gate.
    #[default]
    Anyone,
    OwnerOnly,
}

/// Capability checks that are configurable rather than hard-wired.
///
/// Reward distribution and candidate/verifier registration are always
/// owner-only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub election: ElectionAccess,
    pub verification: VerifierPolicy,
}
