//! Autonomix DPoS core: the aggregate root and its service shell.
//!
//! The node crate ties the engines together:
//! - [`DposState`] owns the stake ledger, election engine, reward distributor
//!   and data registry, and exposes the public entry points
//! - [`DposService`] serialises calls behind one lock, reads the clock and
//!   broadcasts [`DposEvent`]s to subscribers
//! - [`NodeConfig`] loads parameters and policies from TOML
//! - [`DposMetrics`] and [`DposSnapshot`] cover observability and persistence

pub mod access;
pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod service;
pub mod snapshot;
pub mod state;
pub mod tracing_spans;

pub use access::{AccessPolicy, ElectionAccess};
pub use config::NodeConfig;
pub use error::{DposError, ErrorKind};
pub use event::DposEvent;
pub use metrics::DposMetrics;
pub use service::{DposService, EVENT_CHANNEL_CAPACITY};
pub use snapshot::{DposSnapshot, SNAPSHOT_VERSION};
pub use state::DposState;

pub use autonomix_utils::{init_logging, LogFormat};
