use std::env;
use std::path::Path;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};
use turntable::audio::PlaybackEngine;
use turntable::catalog::Catalog;
use turntable::config;
use turntable::library::Track;
use turntable::logging;

use crate::app::App;
use command::Command;

mod command;
mod completion;
mod event_loop;
mod oneshot;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let command = match command::parse(env::args().skip(1)) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("turntable: {msg}\n\n{}", command::USAGE);
            std::process::exit(2);
        }
    };
    let settings::LoadedSettings { settings, fallback } = settings::load_settings();

    match command {
        Command::Help => {
            println!("{}", command::USAGE);
            Ok(())
        }
        Command::Config => {
            if let Some(reason) = &fallback {
                eprintln!("turntable: {reason}");
            }
            oneshot::print_config(&settings)
        }
        Command::Browse | Command::Play(_) | Command::Playlist(_) => {
            logging::init_file(&settings.logging)?;
            if let Some(reason) = &fallback {
                warn!("{reason}");
            }
            let catalog = startup::open_catalog(&settings)?;
            let (source, tracks) = match command {
                Command::Playlist(id) => {
                    let (name, tracks) = startup::playlist_tracks(&catalog, id)?;
                    (format!("Playlist: {name}"), tracks)
                }
                _ => ("Library".to_string(), startup::library_tracks(&catalog)?),
            };
            let autoplay = match command {
                Command::Play(path) => Some(path),
                _ => None,
            };
            run_tui(&settings, tracks, source, autoplay.as_deref(), fallback)
        }
        other => {
            logging::init_cli(&settings.logging)?;
            if let Some(reason) = &fallback {
                warn!("{reason}");
            }
            let catalog = startup::open_catalog(&settings)?;
            run_oneshot(other, &catalog, &settings)
        }
    }
}

fn run_oneshot(
    command: Command,
    catalog: &Catalog,
    settings: &config::Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Import(dir) => {
            oneshot::import(catalog, &dir, settings);
            Ok(())
        }
        Command::Songs => oneshot::songs(catalog),
        Command::Playlists => oneshot::playlists(catalog),
        Command::PlaylistNew { name, description } => {
            oneshot::playlist_new(catalog, &name, description.as_deref())
        }
        Command::PlaylistAdd { playlist, song } => oneshot::playlist_add(catalog, playlist, song),
        Command::Browse
        | Command::Play(_)
        | Command::Playlist(_)
        | Command::Config
        | Command::Help => Ok(()),
    }
}

fn run_tui(
    settings: &config::Settings,
    tracks: Vec<Track>,
    source: String,
    autoplay: Option<&Path>,
    fallback: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = PlaybackEngine::with_default_output();
    let mut app = App::new(tracks, source);
    startup::apply_playback_defaults(&mut app, settings);
    app.status = fallback;
    if let Some(path) = autoplay {
        startup::play_on_start(&mut app, &engine, path);
    }
    info!(tracks = app.tracks.len(), source = %app.source, "starting ui");

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, settings, &mut app, &engine, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
