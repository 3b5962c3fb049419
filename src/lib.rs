//! turntable: a local music library player.
//!
//! The library holds everything below the terminal front end: the playback
//! engine, tag reading, the SQLite catalog, directory import and settings.

pub mod audio;
pub mod catalog;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod metadata;
pub mod paths;

#[cfg(test)]
pub(crate) mod test_support;
