// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikeact Configuration System
//!
//! Type-safe configuration for the spiking activation kernel:
//! - TOML file parsing (`spikeact.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//! - Validation that reports every problem at once
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spikeact_config::load_config;
//!
//! let config = load_config(None, None).expect("Failed to load config");
//! let params = config.spike_act_params().expect("invalid kernel parameters");
//! println!("spike threshold: {}", params.threshold());
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    load_config_or_default, CONFIG_FILE_NAME,
};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Invalid neuron parameters: {0}")]
    Neural(#[from] spikeact_neural::NeuralError),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
