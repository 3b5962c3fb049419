//! Row types returned by the catalog.

use std::fmt;

use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::metadata::{Metadata, keys};

macro_rules! id_type {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                self.0.to_sql()
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map($name)
            }
        }
    )*};
}

id_type!(SongId, ArtistId, AlbumId, PlaylistId, EntryId);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: SongId,
    pub path: String,
    pub title: String,
    pub artist_id: Option<ArtistId>,
    pub album_id: Option<AlbumId>,
    pub composer: Option<String>,
    pub comment: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
}

/// Column list matching [`Song::from_row_at`], for a `songs` table aliased `s`.
pub(super) const SONG_COLUMNS: &str =
    "s.id, s.path, s.title, s.artist_id, s.album_id, s.composer, s.comment, s.genre, s.year";

impl Song {
    pub(super) fn from_row_at(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(at)?,
            path: row.get(at + 1)?,
            title: row.get(at + 2)?,
            artist_id: row.get(at + 3)?,
            album_id: row.get(at + 4)?,
            composer: row.get(at + 5)?,
            comment: row.get(at + 6)?,
            genre: row.get(at + 7)?,
            year: row.get(at + 8)?,
        })
    }
}

/// A song before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSong {
    pub path: String,
    pub title: String,
    pub artist_id: Option<ArtistId>,
    pub album_id: Option<AlbumId>,
    pub composer: Option<String>,
    pub comment: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
}

impl NewSong {
    /// Build from tags read off `path`. Blank fields and the unknown year
    /// (`"0"`) become `None`.
    pub fn from_metadata(path: impl Into<String>, metadata: &Metadata) -> Self {
        let field = |key: &str| {
            metadata
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            path: path.into(),
            title: metadata.title().to_string(),
            artist_id: None,
            album_id: None,
            composer: field(keys::COMPOSER),
            comment: field(keys::COMMENT),
            genre: field(keys::GENRE),
            year: field(keys::YEAR).filter(|y| y != "0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub picture: Option<String>,
}

impl Artist {
    pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            picture: row.get(2)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub art: Option<String>,
    pub artist_id: Option<ArtistId>,
}

impl Album {
    pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            art: row.get(2)?,
            artist_id: row.get(3)?,
        })
    }
}

/// A song joined with its artist and album, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongWithDetails {
    pub song: Song,
    pub artist_name: Option<String>,
    pub artist_picture: Option<String>,
    pub album_name: Option<String>,
    pub album_art: Option<String>,
}

/// `SONG_COLUMNS` plus the joined artist (`ar`) and album (`al`) fields.
pub(super) const DETAIL_COLUMNS: &str = "s.id, s.path, s.title, s.artist_id, s.album_id, \
     s.composer, s.comment, s.genre, s.year, ar.name, ar.pfp, al.name, al.art";

/// Joins for `DETAIL_COLUMNS`, starting from `songs s`.
pub(super) const DETAIL_JOINS: &str = "LEFT JOIN artists ar ON ar.id = s.artist_id \
     LEFT JOIN albums al ON al.id = s.album_id";

impl SongWithDetails {
    pub(super) fn from_row_at(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            song: Song::from_row_at(row, at)?,
            artist_name: row.get(at + 9)?,
            artist_picture: row.get(at + 10)?,
            album_name: row.get(at + 11)?,
            album_art: row.get(at + 12)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub description: Option<String>,
    pub picture: Option<String>,
}

impl Playlist {
    pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            picture: row.get(3)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: EntryId,
    pub playlist_id: PlaylistId,
    pub song_id: SongId,
    pub list_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntryWithSong {
    pub id: EntryId,
    pub list_order: i64,
    pub song: SongWithDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistWithSongs {
    pub playlist: Playlist,
    pub entries: Vec<PlaylistEntryWithSong>,
}
