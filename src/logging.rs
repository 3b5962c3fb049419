//! `tracing` subscriber setup.
//!
//! The TUI owns the terminal, so interactive runs log to a file. One-shot
//! subcommands log to stderr unless a file is configured.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;
use crate::paths;

/// `RUST_LOG` wins over the configured level; a bad directive falls back to `info`.
fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The configured log file, or `turntable.log` in the per-user directory.
pub fn log_path(settings: &LoggingSettings) -> Result<PathBuf, Box<dyn Error>> {
    match &settings.file {
        Some(path) => Ok(path.clone()),
        None => Ok(paths::log_file()?),
    }
}

/// Send logs to the log file (appending). Returns the file's path.
pub fn init_file(settings: &LoggingSettings) -> Result<PathBuf, Box<dyn Error>> {
    let path = log_path(settings)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    // A second init in the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(settings))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(path)
}

/// Log to the configured file if there is one, else to stderr.
pub fn init_cli(settings: &LoggingSettings) -> Result<(), Box<dyn Error>> {
    if settings.file.is_some() {
        init_file(settings)?;
        return Ok(());
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(settings))
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}
