//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use autonomix_datashare::VerifierPolicy;
use autonomix_rewards::RewardPoolSource;
use autonomix_types::{Address, DposParams};
use autonomix_utils::LogFormat;

use crate::access::{AccessPolicy, ElectionAccess};
use crate::DposError;

/// Configuration for a DPoS core instance.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). An empty file is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Account allowed to call admin entry points.
    #[serde(default = "default_owner")]
    pub owner: Address,

    /// Account the reward pool is drawn from. Must approve the custody account.
    #[serde(default = "default_treasury")]
    pub treasury: Address,

    /// Account holding all staked tokens and unclaimed rewards.
    #[serde(default = "default_custody")]
    pub custody: Address,

    /// `"fixed"` or `"treasury_balance"`.
    #[serde(default)]
    pub reward_pool_source: RewardPoolSource,

    /// `"anyone"` or `"owner_only"`.
    #[serde(default)]
    pub election_access: ElectionAccess,

    /// `"anyone"`, `"elected_validators"` or `"registered_verifiers"`.
    #[serde(default)]
    pub verifier_policy: VerifierPolicy,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Election and reward parameters. Last, so it serializes as a trailing table.
    #[serde(default)]
    pub params: DposParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

// Development accounts; real deployments set all three.
fn default_owner() -> Address {
    Address::from_low_u64(0x0A)
}

fn default_treasury() -> Address {
    Address::from_low_u64(0x7E)
}

fn default_custody() -> Address {
    Address::from_low_u64(0xC0)
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DposError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DposError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DposError> {
        let config: Self = toml::from_str(s).map_err(|e| DposError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DposError> {
        toml::to_string_pretty(self).map_err(|e| DposError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), DposError> {
        self.params
            .validate()
            .map_err(|e| DposError::Config(e.to_string()))?;
        for (name, address) in [
            ("owner", self.owner),
            ("treasury", self.treasury),
            ("custody", self.custody),
        ] {
            if address.is_zero() {
                return Err(DposError::Config(format!("{name} must not be the zero address")));
            }
        }
        if self.custody == self.treasury {
            return Err(DposError::Config(
                "custody and treasury must be different accounts".to_string(),
            ));
        }
        Ok(())
    }

    /// Install the global tracing subscriber from `log_format` and `log_level`.
    ///
    /// Returns `false` if one was already installed.
    pub fn init_logging(&self) -> bool {
        autonomix_utils::init_logging(self.log_format, &self.log_level)
    }

    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy {
            election: self.election_access,
            verification: self.verifier_policy,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            treasury: default_treasury(),
            custody: default_custody(),
            reward_pool_source: RewardPoolSource::default(),
            election_access: ElectionAccess::default(),
            verifier_policy: VerifierPolicy::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: DposParams::default(),
        }
    }
}
