use std::path::PathBuf;

use crate::catalog::{SongId, SongWithDetails};
use crate::metadata::{Metadata, keys};

/// One playable row in the UI list.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// `None` for files played straight from disk.
    pub song_id: Option<SongId>,
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl From<&SongWithDetails> for Track {
    fn from(details: &SongWithDetails) -> Self {
        let song = &details.song;
        Self {
            song_id: Some(song.id),
            path: PathBuf::from(&song.path),
            title: song.title.clone(),
            artist: details.artist_name.clone(),
            album: details.album_name.clone(),
            genre: song.genre.clone(),
            year: song.year.clone(),
        }
    }
}

impl Track {
    /// A track for a file outside the catalog.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> Self {
        Self {
            song_id: None,
            path: path.into(),
            title: metadata.title().to_string(),
            artist: non_blank(metadata.artist()),
            album: non_blank(metadata.album()),
            genre: metadata.get(keys::GENRE).and_then(non_blank),
            year: metadata
                .get(keys::YEAR)
                .and_then(non_blank)
                .filter(|y| y != "0"),
        }
    }
}
