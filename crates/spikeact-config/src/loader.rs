// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base values; missing keys take kernel defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)
//!
//! Derived fields are recomputed and the result validated after all tiers.

use crate::{validate_config, ConfigError, ConfigResult, SpikeActConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "spikeact.toml";

/// Find the spikeact configuration file
///
/// Search order:
/// 1. `SPIKEACT_CONFIG_PATH` environment variable
/// 2. Current working directory: `./spikeact.toml`
/// 3. Parent directories, up to 5 levels
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SPIKEACT_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SPIKEACT_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet SPIKEACT_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikeActConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let config: SpikeActConfig = toml::from_str(&content)?;
    debug!(path = %config_file.display(), "loaded configuration file");

    finish(config, cli_args)
}

/// Like [`load_config`] with discovery, but falls back to defaults when no
/// file exists. Environment and CLI overrides still apply.
///
/// A missing file named by `SPIKEACT_CONFIG_PATH` is still an error.
pub fn load_config_or_default(
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikeActConfig> {
    let explicit = env::var_os("SPIKEACT_CONFIG_PATH").is_some();
    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(_)) if !explicit => {
            debug!("no configuration file found; using defaults");
            finish(SpikeActConfig::default(), cli_args)
        }
        Err(e) => Err(e),
    }
}

fn finish(
    mut config: SpikeActConfig,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikeActConfig> {
    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    config.update();
    validate_config(&config)?;
    Ok(config)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or_warn<T: FromStr>(source: &str, value: &str) -> Option<T> {
    let parsed = value.parse::<T>().ok();
    if parsed.is_none() {
        warn!(source, value, "ignoring unparsable configuration override");
    }
    parsed
}

fn parse_bool_or_warn(source: &str, value: &str) -> Option<bool> {
    let parsed = parse_bool(value);
    if parsed.is_none() {
        warn!(source, value, "ignoring unparsable boolean override");
    }
    parsed
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKEACT_SPIKE_EXP` -> `spike.exp`
/// - `SPIKEACT_SPIKE_MAX_HZ` -> `spike.max_hz`
/// - `SPIKEACT_SPIKE_RATE_TAU` -> `spike.rate_tau`
/// - `SPIKEACT_SPIKE_REFRACTORY` -> `spike.tr`
/// - `SPIKEACT_KNA_ON` -> `kna.on`
/// - `SPIKEACT_LOG_LEVEL` -> `logging.level`
///
/// Unparsable values are logged and ignored.
pub fn apply_environment_overrides(config: &mut SpikeActConfig) {
    if let Ok(value) = env::var("SPIKEACT_SPIKE_EXP") {
        if let Some(exp) = parse_bool_or_warn("SPIKEACT_SPIKE_EXP", &value) {
            config.spike.exp = exp;
        }
    }
    if let Ok(value) = env::var("SPIKEACT_SPIKE_MAX_HZ") {
        if let Some(max_hz) = parse_or_warn("SPIKEACT_SPIKE_MAX_HZ", &value) {
            config.spike.max_hz = max_hz;
        }
    }
    if let Ok(value) = env::var("SPIKEACT_SPIKE_RATE_TAU") {
        if let Some(rate_tau) = parse_or_warn("SPIKEACT_SPIKE_RATE_TAU", &value) {
            config.spike.rate_tau = rate_tau;
        }
    }
    if let Ok(value) = env::var("SPIKEACT_SPIKE_REFRACTORY") {
        if let Some(tr) = parse_or_warn("SPIKEACT_SPIKE_REFRACTORY", &value) {
            config.spike.tr = tr;
        }
    }
    if let Ok(value) = env::var("SPIKEACT_KNA_ON") {
        if let Some(on) = parse_bool_or_warn("SPIKEACT_KNA_ON", &value) {
            config.kna.on = on;
        }
    }
    if let Ok(value) = env::var("SPIKEACT_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"max_hz": "100", "spike_exp": "true"}`)
///
/// Recognized keys: `model`, `spike_exp`, `exp_thr`, `max_hz`, `rate_tau`,
/// `refractory`, `vm_tau`, `kna_on`, `log_level`.
pub fn apply_cli_overrides(config: &mut SpikeActConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("model") {
        match value.as_str() {
            "spiking" => config.neuron.model = crate::NeuronModel::Spiking,
            "rate_coded" => config.neuron.model = crate::NeuronModel::RateCoded,
            other => warn!(model = other, "ignoring unknown neuron model override"),
        }
    }

    // Spike settings
    if let Some(value) = cli_args.get("spike_exp") {
        if let Some(exp) = parse_bool_or_warn("spike_exp", value) {
            config.spike.exp = exp;
        }
    }
    if let Some(value) = cli_args.get("exp_thr") {
        if let Some(thr) = parse_or_warn("exp_thr", value) {
            config.spike.exp_thr = thr;
        }
    }
    if let Some(value) = cli_args.get("max_hz") {
        if let Some(max_hz) = parse_or_warn("max_hz", value) {
            config.spike.max_hz = max_hz;
        }
    }
    if let Some(value) = cli_args.get("rate_tau") {
        if let Some(rate_tau) = parse_or_warn("rate_tau", value) {
            config.spike.rate_tau = rate_tau;
        }
    }
    if let Some(value) = cli_args.get("refractory") {
        if let Some(tr) = parse_or_warn("refractory", value) {
            config.spike.tr = tr;
        }
    }

    // Membrane
    if let Some(value) = cli_args.get("vm_tau") {
        if let Some(vm_tau) = parse_or_warn("vm_tau", value) {
            config.act.dt.vm_tau = vm_tau;
        }
    }

    // Adaptation
    if let Some(value) = cli_args.get("kna_on") {
        if let Some(on) = parse_bool_or_warn("kna_on", value) {
            config.kna.on = on;
        }
    }

    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
