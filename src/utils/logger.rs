//! Logging setup
//!
//! Events go to stderr so stdout only carries command output. `--log-file`
//! adds a second, uncoloured sink.

use crate::config::DEFAULT_LOG_FILTER;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber
///
/// `log_level` takes any `EnvFilter` directive (`debug`, `proctree=trace`);
/// without it `RUST_LOG` is used, then `warn`.
///
/// ```no_run
/// use proctree::utils::logger::init_logger;
///
/// init_logger(Some("debug"), None).unwrap();
/// ```
pub fn init_logger(log_level: Option<&str>, log_file: Option<PathBuf>) -> Result<()> {
    let filter = build_filter(log_level)?;

    let file_sink = log_file
        .as_deref()
        .map(open_log_file)
        .transpose()?
        .map(|file| fmt::layer().with_writer(Arc::new(file)).with_ansi(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(file_sink)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::debug!(file = ?log_file, "Logging ready");
    Ok(())
}

fn build_filter(log_level: Option<&str>) -> Result<EnvFilter> {
    match log_level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log level '{directive}'")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

/// Append-mode handle, creating missing parent directories
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))
}
