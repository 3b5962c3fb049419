//! Subcommands that print and exit without opening the TUI.

use std::error::Error;
use std::path::Path;

use turntable::catalog::{Catalog, PlaylistId, SongId};
use turntable::config;
use turntable::library::{ImportEvent, import_directory};

pub fn import(catalog: &Catalog, dir: &Path, settings: &config::Settings) {
    let summary = import_directory(catalog, dir, &settings.library, |event| match event {
        ImportEvent::Started(root) => println!("importing {}", root.display()),
        ImportEvent::File(path) => println!("  {}", path.display()),
        ImportEvent::Finished(_) => {}
    });
    println!(
        "imported {}, skipped {}, failed {}",
        summary.imported, summary.skipped, summary.failed
    );
}

pub fn songs(catalog: &Catalog) -> Result<(), Box<dyn Error>> {
    for details in catalog.songs_with_details()? {
        let song = &details.song;
        println!(
            "{:>5}  {} - {}  [{}]",
            song.id,
            details.artist_name.as_deref().unwrap_or("-"),
            song.title,
            song.path
        );
    }
    Ok(())
}

pub fn playlists(catalog: &Catalog) -> Result<(), Box<dyn Error>> {
    for playlist in catalog.playlists()? {
        match &playlist.description {
            Some(desc) => println!("{:>5}  {}  ({desc})", playlist.id, playlist.name),
            None => println!("{:>5}  {}", playlist.id, playlist.name),
        }
    }
    Ok(())
}

pub fn playlist_new(
    catalog: &Catalog,
    name: &str,
    description: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let id = catalog.create_playlist(name, description, None)?;
    println!("created playlist {id}");
    Ok(())
}

pub fn playlist_add(
    catalog: &Catalog,
    playlist: PlaylistId,
    song: SongId,
) -> Result<(), Box<dyn Error>> {
    let entry = catalog.add_to_playlist(playlist, song)?;
    println!(
        "added song {song} to playlist {playlist} at position {}",
        entry.list_order
    );
    Ok(())
}

pub fn print_config(settings: &config::Settings) -> Result<(), Box<dyn Error>> {
    print!("{}", settings.to_toml()?);
    Ok(())
}
