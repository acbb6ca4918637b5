//! Shared utilities for the Autonomix DPoS core.

pub mod logging;

pub use logging::{init_logging, LogFormat};
