use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::error::CatalogError;

use super::Catalog;
use super::models::{Artist, ArtistId};

impl Catalog {
    pub fn create_artist(&self, name: &str, picture: Option<&str>) -> Result<ArtistId, CatalogError> {
        self.conn.execute(
            "INSERT INTO artists (name, pfp) VALUES (?1, ?2)",
            params![name, picture],
        )?;
        let id = ArtistId(self.conn.last_insert_rowid());
        debug!(%id, name, "artist created");
        Ok(id)
    }

    pub fn artist(&self, id: ArtistId) -> Result<Artist, CatalogError> {
        self.conn
            .query_row(
                "SELECT id, name, pfp FROM artists WHERE id = ?1",
                [id],
                Artist::from_row,
            )
            .optional()?
            .ok_or_else(|| CatalogError::not_found("artist", id))
    }

    /// Exact, case-sensitive match. The oldest row wins if names repeat.
    pub fn find_artist_by_name(&self, name: &str) -> Result<Option<Artist>, CatalogError> {
        let artist = self
            .conn
            .query_row(
                "SELECT id, name, pfp FROM artists WHERE name = ?1 ORDER BY id LIMIT 1",
                [name],
                Artist::from_row,
            )
            .optional()?;
        Ok(artist)
    }

    pub fn artists(&self) -> Result<Vec<Artist>, CatalogError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, pfp FROM artists ORDER BY name COLLATE NOCASE, id")?;
        let rows = stmt.query_map([], Artist::from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}
