//! The song catalog: songs, artists, albums and playlists in SQLite.
//!
//! Lookups by name or path return `Ok(None)` on a miss; reads by id return
//! [`CatalogError::NotFound`]. Only genuine database failures come back as
//! [`CatalogError::Query`].

mod albums;
mod artists;
mod models;
mod playlists;
mod schema;
mod songs;

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::paths;

pub use models::*;

pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        info!(path = %path.display(), "opening catalog");
        Self::from_connection(Connection::open(path)?)
    }

    /// Open the per-user catalog (see [`paths::library_db`]).
    pub fn open_default() -> Result<Self, CatalogError> {
        Self::open(&paths::library_db()?)
    }

    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, CatalogError> {
        schema::initialize(&conn)?;
        debug!("catalog schema ready");
        Ok(Self { conn })
    }

    /// Run `f` in a transaction. Any error rolls back everything `f` did.
    /// Inside an open transaction, `f` simply joins it.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&Catalog) -> Result<T, CatalogError>,
    ) -> Result<T, CatalogError> {
        if !self.conn.is_autocommit() {
            return f(self);
        }
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }
}
