//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The core's external dependencies (clock, token gateway) sit behind traits.
//! This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what the core asked of them
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod token;

pub use clock::NullClock;
pub use token::{GatewayCall, NullToken};
