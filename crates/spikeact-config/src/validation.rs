// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Runs every check and reports all failures together, so one edit cycle
//! can fix a whole file.

use crate::{ConfigError, ConfigResult, SpikeActConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// A kernel parameter section rejected its values
    InvalidParameter { section: &'static str, reason: String },
    /// Derived field does not match its source (missing `update()`)
    StaleDerived { field: &'static str },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter { section, reason } => {
                write!(f, "[{}] {}", section, reason)
            }
            Self::StaleDerived { field } => {
                write!(f, "Derived field {} is stale; call update() after editing", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Expects derived fields to be current (`SpikeActConfig::update`).
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &SpikeActConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

/// All validation failures, in file order
pub fn collect_errors(config: &SpikeActConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_parameters(config, &mut errors);
    validate_derived(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn validate_parameters(config: &SpikeActConfig, errors: &mut Vec<ConfigValidationError>) {
    if let Err(e) = config.act.validate() {
        errors.push(ConfigValidationError::InvalidParameter {
            section: "act",
            reason: e.to_string(),
        });
    }
    if let Err(e) = config.spike.validate() {
        errors.push(ConfigValidationError::InvalidParameter {
            section: "spike",
            reason: e.to_string(),
        });
    }
    if let Err(e) = config.kna.validate() {
        errors.push(ConfigValidationError::InvalidParameter {
            section: "kna",
            reason: e.to_string(),
        });
    }
}

fn validate_derived(config: &SpikeActConfig, errors: &mut Vec<ConfigValidationError>) {
    // Only meaningful when rate_tau itself is valid
    if config.spike.rate_tau > 0.0 && config.spike.is_stale() {
        errors.push(ConfigValidationError::StaleDerived {
            field: "spike.rate_dt",
        });
    }
}

fn validate_logging(config: &SpikeActConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }
    if config.logging.file_logging && config.logging.retention_runs == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.retention_runs".to_string(),
            reason: "must be at least 1 when file logging is on".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SpikeActConfig {
        let mut config = SpikeActConfig::default();
        config.update();
        config
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_collects_every_failure() {
        let mut config = valid_config();
        config.spike.max_hz = -5.0;
        config.kna.on = true;
        config.kna.fast.tau = 0.0;
        config.logging.level = "loud".to_string();

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 3, "{:?}", errors);

        let err = validate_config(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("[spike]"), "{}", msg);
        assert!(msg.contains("[kna]"), "{}", msg);
        assert!(msg.contains("logging.level"), "{}", msg);
    }

    #[test]
    fn test_stale_rate_dt_reported() {
        let mut config = valid_config();
        config.spike.rate_tau = 20.0;
        assert_eq!(
            collect_errors(&config),
            vec![ConfigValidationError::StaleDerived {
                field: "spike.rate_dt"
            }]
        );
        config.update();
        assert!(collect_errors(&config).is_empty());
    }

    #[test]
    fn test_retention_runs_only_checked_with_file_logging() {
        let mut config = valid_config();
        config.logging.retention_runs = 0;
        assert!(validate_config(&config).is_ok());
        config.logging.file_logging = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_level_is_case_insensitive() {
        let mut config = valid_config();
        config.logging.level = "WARN".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
