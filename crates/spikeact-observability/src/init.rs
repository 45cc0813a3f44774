// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for spikeact binaries
//!
//! Console output (stderr) always; with the `file-logging` feature and
//! `file_logging = true`, also JSON log files in a timestamped run folder.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Logging initialization result
///
/// Hold it for the life of the process; file writers flush on drop.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize the global subscriber
///
/// Creates a timestamped folder structure when file logging is on:
/// ```text
/// ./logs/
///   └── run_20250101_120000/
///       ├── spikeact-neural.log
///       ├── spikeact-config.log
///       ├── spikeact-observability.log
///       └── spikeact.log (everything under the spikeact* targets)
/// ```
///
/// Fails if the level/flag directives do not parse, the run folder cannot be
/// created, or a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(&config.level);
    let console_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(console_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_target(true)
            .with_filter(console_filter)
            .boxed(),
    };
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let (file_guards, log_dir) = if config.file_logging {
        let (file_layers, guards, run_folder) = file_layers(&config.log_dir, &filter)?;
        layers.extend(file_layers);
        (guards, Some(run_folder))
    } else {
        (Vec::new(), None)
    };

    #[cfg(not(feature = "file-logging"))]
    let log_dir: Option<PathBuf> = None;

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    #[cfg(not(feature = "file-logging"))]
    if config.file_logging {
        tracing::warn!("file logging requested but the file-logging feature is not compiled in");
    }

    if log_dir.is_some() {
        let removed = cleanup_old_logs(&config.log_dir, config.retention_days, config.retention_runs)?;
        if removed > 0 {
            tracing::debug!(removed, "removed old log run folders");
        }
    }

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
    })
}

#[cfg(feature = "file-logging")]
fn file_layers(
    base_log_dir: &Path,
    filter: &str,
) -> Result<(
    Vec<BoxedLayer>,
    Vec<tracing_appender::non_blocking::WorkerGuard>,
    PathBuf,
)> {
    use tracing_appender::rolling;

    let timestamp = Utc::now().format(RUN_TIMESTAMP_FORMAT);
    let run_folder = base_log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guards = Vec::new();

    for crate_name in crate::KNOWN_CRATES {
        let appender = rolling::daily(&run_folder, format!("{}.log", crate_name));
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);

        // Root name is a prefix of every target, so spikeact.log is the combined file
        let crate_filter = if *crate_name == "spikeact" {
            EnvFilter::try_new(filter)
        } else {
            EnvFilter::try_new(format!("{}=debug", crate::crate_target(crate_name)))
        }
        .with_context(|| format!("Invalid log filter for {}", crate_name))?;

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(crate_filter)
            .boxed();
        layers.push(layer);
    }

    Ok((layers, guards, run_folder))
}

/// Remove old run folders under `base_log_dir`
///
/// Folders older than `retention_days` go first; of the rest only the newest
/// `retention_runs` are kept. Entries that are not `run_<timestamp>` folders
/// are left alone. Returns the number of folders removed.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    let entries = std::fs::read_dir(base_log_dir)
        .with_context(|| format!("Failed to read log directory: {}", base_log_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let parsed = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(RUN_PREFIX))
            .and_then(|ts| NaiveDateTime::parse_from_str(ts, RUN_TIMESTAMP_FORMAT).ok());
        if let Some(dt) = parsed {
            runs.push((path, dt.and_utc()));
        }
    }

    // Newest first
    runs.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    let mut kept = 0;
    for (path, dt) in &runs {
        if *dt >= cutoff_date && kept < retention_runs {
            kept += 1;
            continue;
        }
        match std::fs::remove_dir_all(path) {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to remove old log directory"
            ),
        }
    }

    Ok(removed)
}
