//! Where turntable keeps its per-user files.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::CatalogError;

/// Overrides the per-user directory, e.g. for a portable install.
pub const ENV_DATA_DIR: &str = "TURNTABLE_DATA_DIR";

/// The per-user directory holding the catalog database and the log file.
///
/// `TURNTABLE_DATA_DIR` wins; otherwise the platform configuration
/// directory (`$XDG_CONFIG_HOME/turntable` on Linux).
pub fn data_dir() -> Result<PathBuf, CatalogError> {
    if let Some(base) = env::var_os(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(base));
    }
    ProjectDirs::from("", "", "turntable")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(CatalogError::NoConfigDir)
}

pub fn library_db() -> Result<PathBuf, CatalogError> {
    Ok(data_dir()?.join("library.db"))
}

pub fn log_file() -> Result<PathBuf, CatalogError> {
    Ok(data_dir()?.join("turntable.log"))
}
