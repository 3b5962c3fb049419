use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::{AlbumId, ArtistId, Catalog, NewSong, SongId};
use crate::config::LibrarySettings;
use crate::error::{CatalogError, ImportError};
use crate::metadata::{self, Metadata};

use super::scan::{files, is_audio_file};

/// Progress notifications from [`import_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    Started(PathBuf),
    /// A regular file was reached, before it is imported or skipped.
    File(PathBuf),
    Finished(ImportSummary),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Files without an audio extension.
    pub skipped: usize,
    pub failed: usize,
}

/// Add `path` to the catalog, replacing any row already stored for it.
///
/// Artist and album are looked up by name (the album within its artist)
/// and created when missing. Everything happens in one transaction.
pub fn import_file(catalog: &Catalog, path: &Path) -> Result<SongId, ImportError> {
    let probe = metadata::read_path(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let key = path.display().to_string();
    let tags = &probe.metadata;

    let id = catalog.transaction(|c| {
        while let Some(old) = c.find_song_by_path(&key)? {
            debug!(id = %old.id, path = %key, "replacing previous import");
            c.delete_song(old.id)?;
        }

        let artist_id = resolve_artist(c, tags)?;
        let album_id = resolve_album(c, tags, artist_id)?;

        let song = NewSong {
            artist_id,
            album_id,
            ..NewSong::from_metadata(key.as_str(), tags)
        };
        c.create_song(&song)
    })?;

    info!(%id, path = %key, "imported");
    Ok(id)
}

fn named(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

fn resolve_artist(
    c: &Catalog,
    tags: &Metadata,
) -> Result<Option<ArtistId>, CatalogError> {
    let Some(name) = named(tags.artist()) else {
        return Ok(None);
    };
    let id = match c.find_artist_by_name(name)? {
        Some(artist) => artist.id,
        None => c.create_artist(name, None)?,
    };
    Ok(Some(id))
}

fn resolve_album(
    c: &Catalog,
    tags: &Metadata,
    artist_id: Option<ArtistId>,
) -> Result<Option<AlbumId>, CatalogError> {
    let Some(name) = named(tags.album()) else {
        return Ok(None);
    };
    let id = match c.find_album(name, artist_id)? {
        Some(album) => album.id,
        None => c.create_album(name, tags.album_art(), artist_id)?,
    };
    Ok(Some(id))
}

/// Import every audio file under `dir`.
///
/// `on_event` sees `Started`, then `File` for each regular file reached,
/// then `Finished`. A file that fails to import is logged and counted; the
/// walk carries on.
pub fn import_directory(
    catalog: &Catalog,
    dir: &Path,
    settings: &LibrarySettings,
    mut on_event: impl FnMut(&ImportEvent),
) -> ImportSummary {
    let root = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    info!(dir = %root.display(), "import started");
    on_event(&ImportEvent::Started(root.clone()));

    let mut summary = ImportSummary::default();
    for path in files(&root, settings) {
        on_event(&ImportEvent::File(path.clone()));

        if !is_audio_file(&path, settings) {
            summary.skipped += 1;
            continue;
        }
        match import_file(catalog, &path) {
            Ok(_) => summary.imported += 1,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "import failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        failed = summary.failed,
        "import finished"
    );
    on_event(&ImportEvent::Finished(summary));
    summary
}
