//! Data verification registry.
//!
//! Vehicles submit a content fingerprint ([`DataHash`](autonomix_types::DataHash))
//! with structured metadata. An authorized verifier then accepts or rejects it
//! exactly once; records are never deleted.

pub mod error;
pub mod metadata;
pub mod policy;
pub mod record;
pub mod registry;

pub use error::RegistryError;
pub use metadata::DataMetadata;
pub use policy::VerifierPolicy;
pub use record::{DataRecord, DataStatus};
pub use registry::{DataRegistry, DataRegistrySnapshot};
