// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Single-neuron spike probe.
//!
//! Loads `spikeact.toml` (or defaults), drives one neuron with constant
//! conductances, and prints a JSON summary of the spike train to stdout.
//! Console logs go to stderr.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};

use spikeact::config::{load_config, load_config_or_default};
use spikeact::observability::{debug_flags_help, init_logging, parse_debug_flags};
use spikeact::probe::{run_probe, ProbeSettings};

struct Args {
    config: Option<PathBuf>,
    settings: ProbeSettings,
    overrides: HashMap<String, String>,
    dump_config: bool,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: spike_probe [--config <path>] [--cycles <n>] [--ge <g>] [--gi <g>] [--seed <n>]\n\
         \x20                  [--set <key>=<value>]... [--dump-config] [--debug-<crate>]\n\n\
         Defaults:\n\
         - config: SPIKEACT_CONFIG_PATH, else ./spikeact.toml or a parent, else built-in\n\
         - cycles: 200, ge: 1.0, gi: 0.0, seed: 0\n\n\
         --set keys: model, spike_exp, exp_thr, max_hz, rate_tau, refractory, vm_tau, kna_on, log_level\n\n\
         {}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> T {
    let raw = value.unwrap_or_else(|| usage_and_exit());
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid value for {flag}: {raw}");
        usage_and_exit();
    })
}

fn parse_args() -> Args {
    let mut parsed = Args {
        config: None,
        settings: ProbeSettings::default(),
        overrides: HashMap::new(),
        dump_config: false,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                parsed.config = Some(PathBuf::from(v));
            }
            "--cycles" => parsed.settings.cycles = parse_value("--cycles", args.next()),
            "--ge" => parsed.settings.ge = parse_value("--ge", args.next()),
            "--gi" => parsed.settings.gi = parse_value("--gi", args.next()),
            "--seed" => parsed.settings.seed = parse_value("--seed", args.next()),
            "--set" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                match v.split_once('=') {
                    Some((key, value)) => {
                        parsed.overrides.insert(key.trim().to_string(), value.trim().to_string());
                    }
                    None => {
                        eprintln!("Expected <key>=<value> after --set, got: {v}");
                        usage_and_exit();
                    }
                }
            }
            "--dump-config" => parsed.dump_config = true,
            "-h" | "--help" => usage_and_exit(),
            // consumed by parse_debug_flags
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }

    parsed
}

fn main() -> Result<()> {
    let args = parse_args();

    let config = match &args.config {
        Some(path) => load_config(Some(path), Some(&args.overrides)),
        None => load_config_or_default(Some(&args.overrides)),
    }
    .context("Failed to load configuration")?;

    let _logging = init_logging(&parse_debug_flags(), &config.logging)
        .context("Failed to initialize logging")?;

    if args.dump_config {
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let kind = config.neuron_kind()?;
    let summary = run_probe(&kind, args.settings);
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
    );
    Ok(())
}
