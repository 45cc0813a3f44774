// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikeact-observability
//!
//! Logging setup shared by spikeact binaries, with per-crate debug flag
//! support. Library crates only emit `tracing` events; installing a
//! subscriber is left to the binary.
//!
//! ## Features
//! - `file-logging`: JSON log files in a timestamped run folder, with retention

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "spikeact",
    "spikeact-neural",
    "spikeact-config",
    "spikeact-observability",
];

/// `tracing` target for a crate name (`spikeact-neural` → `spikeact_neural`)
pub fn crate_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
