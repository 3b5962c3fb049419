use std::path::Path;

use tracing::{info, warn};
use turntable::audio::PlaybackEngine;
use turntable::catalog::{Catalog, PlaylistId};
use turntable::config;
use turntable::error::CatalogError;
use turntable::library::Track;

use crate::app::App;

/// Open the catalog at `catalog.database_path`, else the per-user default.
pub fn open_catalog(settings: &config::Settings) -> Result<Catalog, CatalogError> {
    match &settings.catalog.database_path {
        Some(path) => Catalog::open(path),
        None => Catalog::open_default(),
    }
}

pub fn library_tracks(catalog: &Catalog) -> Result<Vec<Track>, CatalogError> {
    Ok(catalog
        .songs_with_details()?
        .iter()
        .map(Track::from)
        .collect())
}

/// The playlist's songs in list order, and its name for the status box.
pub fn playlist_tracks(
    catalog: &Catalog,
    id: PlaylistId,
) -> Result<(String, Vec<Track>), CatalogError> {
    let playlist = catalog.playlist_with_songs(id)?;
    let tracks = playlist
        .entries
        .iter()
        .map(|entry| Track::from(&entry.song))
        .collect();
    Ok((playlist.playlist.name, tracks))
}

/// Seed the model from settings before the first frame.
pub fn apply_playback_defaults(app: &mut App, settings: &config::Settings) {
    app.follow_playback = settings.ui.follow_playback;
    app.set_volume(settings.playback.start_volume);
}

/// Play `path` right away for `turntable play <file>`. A file that is not in
/// the list is added to the top of it.
pub fn play_on_start(app: &mut App, engine: &PlaybackEngine, path: &Path) {
    if let Err(e) = engine.play(path) {
        warn!(path = %path.display(), error = %e, "cannot play file");
        app.status = Some(format!("cannot play {}: {e}", path.display()));
        return;
    }
    engine.set_volume(app.volume());

    let idx = match app.position_of(path) {
        Some(idx) => idx,
        None => {
            app.tracks
                .insert(0, Track::from_metadata(path, &engine.metadata()));
            0
        }
    };
    info!(path = %path.display(), "playing on start");
    app.started(idx);
}
