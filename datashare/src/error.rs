use crate::record::DataStatus;
use autonomix_types::{Address, DataHash};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("data {0} already submitted")]
    DuplicateSubmission(DataHash),

    #[error("data {0} not found")]
    NotFound(DataHash),

    #[error("data {data_hash} already {status}")]
    AlreadyVerified { data_hash: DataHash, status: DataStatus },

    #[error("{0} is not allowed to verify data")]
    Unauthorized(Address),

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("the zero hash is not a valid data fingerprint")]
    ZeroHash,
}
