//! Error types shared by the playback engine and the catalog.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why `PlaybackEngine::play` could not install a new track.
#[derive(Debug, Error)]
pub enum PlayError {
    #[error("unsupported file type {extension:?}")]
    UnsupportedFormat { extension: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("cannot start playback at the requested offset: {0}")]
    StartOffset(#[source] SeekError),
}

/// Transport errors for operations that need a loaded track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("no active stream")]
    NoActiveStream,
}

#[derive(Debug, Error)]
pub enum SeekError {
    #[error("no active stream")]
    NoActiveStream,

    #[error("seek target {seconds}s outside 0..={duration}s")]
    OutOfBounds { seconds: f64, duration: f64 },

    #[error("decoder rejected seek: {0}")]
    Decoder(#[source] rodio::source::SeekError),
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to open audio output: {0}")]
    Open(String),

    #[error("audio output thread has exited")]
    Closed,
}

/// Catalog failures. A lookup miss is never reported as `Query`.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("catalog query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("no per-user configuration directory is available")]
    NoConfigDir,

    #[error("failed to prepare catalog directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why one file could not be imported into the catalog.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CatalogError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}
