use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::error::CatalogError;

use super::Catalog;
use super::models::{DETAIL_COLUMNS, DETAIL_JOINS, NewSong, SONG_COLUMNS, Song, SongId, SongWithDetails};

impl Catalog {
    pub fn create_song(&self, song: &NewSong) -> Result<SongId, CatalogError> {
        self.conn.execute(
            "INSERT INTO songs (path, title, artist_id, album_id, composer, comment, genre, year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                song.path,
                song.title,
                song.artist_id,
                song.album_id,
                song.composer,
                song.comment,
                song.genre,
                song.year,
            ],
        )?;
        let id = SongId(self.conn.last_insert_rowid());
        debug!(%id, path = %song.path, "song created");
        Ok(id)
    }

    pub fn song(&self, id: SongId) -> Result<Song, CatalogError> {
        self.conn
            .query_row(
                &format!("SELECT {SONG_COLUMNS} FROM songs s WHERE s.id = ?1"),
                [id],
                |row| Song::from_row_at(row, 0),
            )
            .optional()?
            .ok_or_else(|| CatalogError::not_found("song", id))
    }

    /// The most recent row for `path`, if any.
    pub fn find_song_by_path(&self, path: &str) -> Result<Option<Song>, CatalogError> {
        let song = self
            .conn
            .query_row(
                &format!(
                    "SELECT {SONG_COLUMNS} FROM songs s WHERE s.path = ?1 ORDER BY s.id DESC LIMIT 1"
                ),
                [path],
                |row| Song::from_row_at(row, 0),
            )
            .optional()?;
        Ok(song)
    }

    pub fn songs(&self) -> Result<Vec<Song>, CatalogError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SONG_COLUMNS} FROM songs s ORDER BY s.id"))?;
        let rows = stmt.query_map([], |row| Song::from_row_at(row, 0))?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Every song with its artist and album joined in, ordered by title.
    pub fn songs_with_details(&self) -> Result<Vec<SongWithDetails>, CatalogError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DETAIL_COLUMNS} FROM songs s {DETAIL_JOINS}
             ORDER BY s.title COLLATE NOCASE, s.id"
        ))?;
        let rows = stmt.query_map([], |row| SongWithDetails::from_row_at(row, 0))?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Remove a song along with its playlist entries and tag values.
    pub fn delete_song(&self, id: SongId) -> Result<(), CatalogError> {
        self.transaction(|catalog| {
            catalog
                .conn
                .execute("DELETE FROM playlist_entries WHERE song_id = ?1", [id])?;
            catalog
                .conn
                .execute("DELETE FROM tag_values WHERE song_id = ?1", [id])?;
            let removed = catalog.conn.execute("DELETE FROM songs WHERE id = ?1", [id])?;
            if removed == 0 {
                return Err(CatalogError::not_found("song", id));
            }
            debug!(%id, "song deleted");
            Ok(())
        })
    }
}
