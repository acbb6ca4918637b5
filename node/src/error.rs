use autonomix_datashare::RegistryError;
use autonomix_election::ElectionError;
use autonomix_rewards::RewardError;
use autonomix_staking::StakingError;
use autonomix_token::TokenError;
use autonomix_types::{Address, TokenAmount, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DposError {
    #[error("invalid input: {0}")]
    Types(#[from] TypesError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("staking error: {0}")]
    Staking(#[from] StakingError),

    #[error("election error: {0}")]
    Election(#[from] ElectionError),

    #[error("reward error: {0}")]
    Reward(#[from] RewardError),

    #[error("data registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("stake of {amount} is below the minimum of {minimum}")]
    BelowMinimumStake {
        amount: TokenAmount,
        minimum: TokenAmount,
    },

    #[error("{caller} is not authorized to {action}")]
    Unauthorized { caller: Address, action: &'static str },

    #[error("the custody account cannot {action}")]
    CustodyAccount { action: &'static str },

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Coarse classification a caller can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input. Fix the request.
    InputValidation,
    /// Not enough balance, allowance, stake or rewards. Top up and retry.
    InsufficientResource,
    /// Too early. Retry after the cooldown.
    TimingGate,
    /// Caller lacks the required role.
    Authorization,
    /// Duplicate, missing or already-decided record.
    Record,
    /// Configuration, persistence or accounting fault.
    Internal,
}

impl DposError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Types(_) | Self::BelowMinimumStake { .. } | Self::Config(_) => {
                ErrorKind::InputValidation
            }
            Self::Token(e) => match e {
                TokenError::InsufficientAllowance { .. } | TokenError::InsufficientBalance { .. } => {
                    ErrorKind::InsufficientResource
                }
                TokenError::ZeroAddress => ErrorKind::InputValidation,
                TokenError::Overflow | TokenError::Rejected(_) => ErrorKind::Internal,
            },
            Self::Staking(e) => match e {
                StakingError::ZeroAmount | StakingError::ZeroAddress => ErrorKind::InputValidation,
                StakingError::InsufficientStake { .. } | StakingError::InsufficientRewards { .. } => {
                    ErrorKind::InsufficientResource
                }
                StakingError::DelegateNotFound(_) => ErrorKind::Record,
                StakingError::Overflow | StakingError::Inconsistent(_) => ErrorKind::Internal,
            },
            Self::Election(e) => match e {
                ElectionError::ElectionNotDue { .. } => ErrorKind::TimingGate,
                ElectionError::InvalidLimit => ErrorKind::InputValidation,
                ElectionError::DuplicateValidator(_) | ElectionError::OversizedSet { .. } => {
                    ErrorKind::Internal
                }
            },
            Self::Reward(e) => match e {
                RewardError::EmptyValidatorSet | RewardError::NoElectedStake => ErrorKind::Record,
                RewardError::EmptyPool | RewardError::NothingToClaim(_) => {
                    ErrorKind::InsufficientResource
                }
                RewardError::Overflow => ErrorKind::Internal,
            },
            Self::Registry(e) => match e {
                RegistryError::DuplicateSubmission(_)
                | RegistryError::NotFound(_)
                | RegistryError::AlreadyVerified { .. } => ErrorKind::Record,
                RegistryError::Unauthorized(_) => ErrorKind::Authorization,
                RegistryError::InvalidMetadata(_) | RegistryError::ZeroHash => {
                    ErrorKind::InputValidation
                }
            },
            Self::Unauthorized { .. } | Self::CustodyAccount { .. } => ErrorKind::Authorization,
            Self::Snapshot(_) | Self::Metrics(_) | Self::Invariant(_) => ErrorKind::Internal,
        }
    }

    /// Whether the same call can succeed later without changing its input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::TimingGate | ErrorKind::InsufficientResource
        )
    }
}
