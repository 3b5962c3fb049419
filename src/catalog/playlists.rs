use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::error::CatalogError;

use super::Catalog;
use super::models::{
    DETAIL_COLUMNS, DETAIL_JOINS, EntryId, Playlist, PlaylistEntry, PlaylistEntryWithSong,
    PlaylistId, PlaylistWithSongs, SongId, SongWithDetails,
};

impl Catalog {
    pub fn create_playlist(
        &self,
        name: &str,
        description: Option<&str>,
        picture: Option<&str>,
    ) -> Result<PlaylistId, CatalogError> {
        self.conn.execute(
            "INSERT INTO playlists (name, description, picture) VALUES (?1, ?2, ?3)",
            params![name, description, picture],
        )?;
        let id = PlaylistId(self.conn.last_insert_rowid());
        debug!(%id, name, "playlist created");
        Ok(id)
    }

    pub fn playlists(&self) -> Result<Vec<Playlist>, CatalogError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description, picture FROM playlists ORDER BY id")?;
        let rows = stmt.query_map([], Playlist::from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn playlist(&self, id: PlaylistId) -> Result<Playlist, CatalogError> {
        self.conn
            .query_row(
                "SELECT id, name, description, picture FROM playlists WHERE id = ?1",
                [id],
                Playlist::from_row,
            )
            .optional()?
            .ok_or_else(|| CatalogError::not_found("playlist", id))
    }

    /// Remove a playlist and all of its entries. The songs stay.
    pub fn delete_playlist(&self, id: PlaylistId) -> Result<(), CatalogError> {
        self.transaction(|catalog| {
            catalog
                .conn
                .execute("DELETE FROM playlist_entries WHERE playlist_id = ?1", [id])?;
            let removed = catalog
                .conn
                .execute("DELETE FROM playlists WHERE id = ?1", [id])?;
            if removed == 0 {
                return Err(CatalogError::not_found("playlist", id));
            }
            Ok(())
        })
    }

    /// Append `song` to the end of `playlist`.
    pub fn add_to_playlist(
        &self,
        playlist: PlaylistId,
        song: SongId,
    ) -> Result<PlaylistEntry, CatalogError> {
        self.transaction(|catalog| {
            catalog.playlist(playlist)?;
            catalog.song(song)?;
            let list_order: i64 = catalog.conn.query_row(
                "SELECT COALESCE(MAX(list_order), -1) + 1 FROM playlist_entries WHERE playlist_id = ?1",
                [playlist],
                |row| row.get(0),
            )?;
            catalog.conn.execute(
                "INSERT INTO playlist_entries (playlist_id, song_id, list_order) VALUES (?1, ?2, ?3)",
                params![playlist, song, list_order],
            )?;
            let id = EntryId(catalog.conn.last_insert_rowid());
            debug!(%id, %playlist, %song, list_order, "playlist entry added");
            Ok(PlaylistEntry {
                id,
                playlist_id: playlist,
                song_id: song,
                list_order,
            })
        })
    }

    pub fn remove_playlist_entry(&self, entry: EntryId) -> Result<(), CatalogError> {
        let removed = self
            .conn
            .execute("DELETE FROM playlist_entries WHERE id = ?1", [entry])?;
        if removed == 0 {
            return Err(CatalogError::not_found("playlist entry", entry));
        }
        Ok(())
    }

    /// The playlist with its entries in list order, each joined with song details.
    pub fn playlist_with_songs(&self, id: PlaylistId) -> Result<PlaylistWithSongs, CatalogError> {
        let playlist = self.playlist(id)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT pe.id, pe.list_order, {DETAIL_COLUMNS}
             FROM playlist_entries pe
             JOIN songs s ON s.id = pe.song_id
             {DETAIL_JOINS}
             WHERE pe.playlist_id = ?1
             ORDER BY pe.list_order, pe.id"
        ))?;
        let rows = stmt.query_map([id], |row| {
            Ok(PlaylistEntryWithSong {
                id: row.get(0)?,
                list_order: row.get(1)?,
                song: SongWithDetails::from_row_at(row, 2)?,
            })
        })?;
        let entries = rows.collect::<Result<_, _>>()?;
        Ok(PlaylistWithSongs { playlist, entries })
    }
}
