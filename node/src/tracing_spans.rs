//! Pre-built [`tracing::Span`] constructors for the core's entry points.
//!
//! Consistent span names and field sets make it easy to filter, search, and
//! correlate traces across an embedding host.

use autonomix_types::{Address, Timestamp};
use tracing::{info_span, Span};

/// Span covering one mutating entry point.
pub fn call_span(operation: &'static str, caller: &Address, now: Timestamp) -> Span {
    info_span!("dpos_call", op = operation, caller = %caller, now = now.as_secs())
}

/// Span covering a snapshot or restore.
pub fn snapshot_span(action: &'static str) -> Span {
    info_span!("dpos_snapshot", action)
}
