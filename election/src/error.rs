use autonomix_types::{Address, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElectionError {
    #[error("election not due: now {now}, next election at {next_due}")]
    ElectionNotDue { now: Timestamp, next_due: Timestamp },

    #[error("max_validators must be at least 1")]
    InvalidLimit,

    #[error("validator {0} appears more than once in the set")]
    DuplicateValidator(Address),

    #[error("validator set of {size} exceeds the limit of {max}")]
    OversizedSet { size: usize, max: usize },
}
