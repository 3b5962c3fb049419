//! Embedded tag extraction.
//!
//! `read` never fails: a file whose tags cannot be parsed still yields a
//! `Metadata` with the file name as title and every other field empty.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Seek};
use std::ops::Index;
use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use lofty::error::Result as LoftyResult;
use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::picture::{Picture, PictureType};
use lofty::tag::{Accessor, ItemKey, Tag};
use tracing::debug;

/// Field names used in `Metadata`.
pub mod keys {
    pub const TITLE: &str = "title";
    pub const ARTIST: &str = "artist";
    pub const ALBUM: &str = "album";
    pub const ALBUM_ARTIST: &str = "albumartist";
    pub const COMPOSER: &str = "composer";
    pub const COMMENT: &str = "comment";
    pub const GENRE: &str = "genre";
    pub const YEAR: &str = "year";
    pub const ALBUM_ART: &str = "albumArt";
}

/// Tag fields of one audio file, keyed by the names in [`keys`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Metadata for a file without readable tags.
    pub fn fallback(path: &Path) -> Self {
        let mut m = Metadata::default();
        m.insert(keys::TITLE, base_name(path));
        for key in [
            keys::ARTIST,
            keys::ALBUM,
            keys::ALBUM_ARTIST,
            keys::COMPOSER,
            keys::COMMENT,
            keys::GENRE,
        ] {
            m.insert(key, String::new());
        }
        m.insert(keys::YEAR, "0");
        m
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn title(&self) -> &str {
        self.get(keys::TITLE).unwrap_or_default()
    }

    pub fn artist(&self) -> &str {
        self.get(keys::ARTIST).unwrap_or_default()
    }

    pub fn album(&self) -> &str {
        self.get(keys::ALBUM).unwrap_or_default()
    }

    pub fn album_art(&self) -> Option<&str> {
        self.get(keys::ALBUM_ART)
    }
}

impl Index<&str> for Metadata {
    type Output = str;

    fn index(&self, key: &str) -> &str {
        match self.0.get(key) {
            Some(v) => v,
            None => panic!("metadata has no field {key:?}"),
        }
    }
}

/// Result of one tag read: the fields plus the container's own duration
/// estimate, which the decoder uses when it cannot tell its length.
#[derive(Debug, Clone)]
pub struct Probe {
    pub metadata: Metadata,
    pub duration: Option<Duration>,
}

/// Read tags from `reader`, which must be positioned at the start of the
/// file. The reader's position is unspecified afterwards.
pub fn read<R: Read + Seek>(reader: R, path: &Path) -> Probe {
    match parse(reader) {
        Ok(tagged) => {
            let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
            let metadata = match tagged.primary_tag().or_else(|| tagged.first_tag()) {
                Some(tag) => from_tag(tag, path),
                None => Metadata::fallback(path),
            };
            Probe { metadata, duration }
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tags");
            Probe {
                metadata: Metadata::fallback(path),
                duration: None,
            }
        }
    }
}

/// Open `path` and read its tags.
pub fn read_path(path: &Path) -> io::Result<Probe> {
    let mut file = File::open(path)?;
    Ok(read(&mut file, path))
}

fn parse<R: Read + Seek>(reader: R) -> LoftyResult<TaggedFile> {
    lofty::probe::Probe::new(reader).guess_file_type()?.read()
}

fn from_tag(tag: &Tag, path: &Path) -> Metadata {
    let text = |v: Option<&str>| v.map(str::trim).unwrap_or_default().to_string();

    let mut m = Metadata::default();

    let title = text(tag.title().as_deref());
    if title.is_empty() {
        m.insert(keys::TITLE, base_name(path));
    } else {
        m.insert(keys::TITLE, title);
    }
    m.insert(keys::ARTIST, text(tag.artist().as_deref()));
    m.insert(keys::ALBUM, text(tag.album().as_deref()));
    m.insert(keys::ALBUM_ARTIST, text(tag.get_string(&ItemKey::AlbumArtist)));
    m.insert(keys::COMPOSER, text(tag.get_string(&ItemKey::Composer)));
    m.insert(keys::COMMENT, text(tag.comment().as_deref()));
    m.insert(keys::GENRE, text(tag.genre().as_deref()));
    m.insert(keys::YEAR, tag.year().unwrap_or(0).to_string());

    if let Some(pic) = cover(tag) {
        m.insert(keys::ALBUM_ART, data_uri(pic));
    }

    m
}

/// Prefer the front cover, otherwise whatever picture comes first.
fn cover(tag: &Tag) -> Option<&Picture> {
    let pictures = tag.pictures();
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .filter(|p| !p.data().is_empty())
}

fn data_uri(pic: &Picture) -> String {
    let mime = pic
        .mime_type()
        .map(|m| m.as_str())
        .unwrap_or("application/octet-stream");
    format!("data:{};base64,{}", mime, STANDARD.encode(pic.data()))
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
