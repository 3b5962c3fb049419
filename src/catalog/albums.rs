use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::error::CatalogError;

use super::Catalog;
use super::models::{Album, AlbumId, ArtistId};

impl Catalog {
    pub fn create_album(
        &self,
        name: &str,
        art: Option<&str>,
        artist_id: Option<ArtistId>,
    ) -> Result<AlbumId, CatalogError> {
        self.conn.execute(
            "INSERT INTO albums (name, art, artist_id) VALUES (?1, ?2, ?3)",
            params![name, art, artist_id],
        )?;
        let id = AlbumId(self.conn.last_insert_rowid());
        debug!(%id, name, "album created");
        Ok(id)
    }

    pub fn album(&self, id: AlbumId) -> Result<Album, CatalogError> {
        self.conn
            .query_row(
                "SELECT id, name, art, artist_id FROM albums WHERE id = ?1",
                [id],
                Album::from_row,
            )
            .optional()?
            .ok_or_else(|| CatalogError::not_found("album", id))
    }

    /// Albums are scoped by artist: the same name under two artists is two
    /// albums. `None` matches albums with no artist.
    pub fn find_album(
        &self,
        name: &str,
        artist_id: Option<ArtistId>,
    ) -> Result<Option<Album>, CatalogError> {
        let album = self
            .conn
            .query_row(
                "SELECT id, name, art, artist_id FROM albums
                 WHERE name = ?1 AND artist_id IS ?2
                 ORDER BY id LIMIT 1",
                params![name, artist_id],
                Album::from_row,
            )
            .optional()?;
        Ok(album)
    }

    pub fn albums(&self) -> Result<Vec<Album>, CatalogError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, art, artist_id FROM albums ORDER BY name COLLATE NOCASE, id")?;
        let rows = stmt.query_map([], Album::from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}
