use serde::{Deserialize, Serialize};

/// Who may call `verify`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifierPolicy {
    /// Any caller. Matches the permissive deployed frontend.
    Anyone,
    /// Members of the current validator set.
    #[default]
    ElectedValidators,
    /// Addresses the owner registered explicitly.
    RegisteredVerifiers,
}

impl VerifierPolicy {
    pub fn permits(&self, is_elected: bool, is_registered: bool) -> bool {
        match self {
            Self::Anyone => true,
            Self::ElectedValidators => is_elected,
            Self::RegisteredVerifiers => is_registered,
        }
    }
}
