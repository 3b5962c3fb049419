use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};
use turntable::audio::PlaybackEngine;
use turntable::config;

use super::completion::CompletionWatch;
use crate::app::{App, PlaybackState};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    pub completion: CompletionWatch,
    last_poll: Option<Instant>,
}

/// Main terminal event loop: handles input, UI drawing and playback polling.
/// Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    engine: &PlaybackEngine,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let poll_interval = Duration::from_millis(settings.playback.poll_interval_ms);

    loop {
        if state.last_poll.is_none_or(|t| t.elapsed() >= poll_interval) {
            poll_playback(settings, app, engine, state);
            state.last_poll = Some(Instant::now());
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, engine, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Refresh the model from the engine and advance when a track finishes.
pub fn poll_playback(
    settings: &config::Settings,
    app: &mut App,
    engine: &PlaybackEngine,
    state: &mut EventLoopState,
) {
    let Some(snapshot) = engine.snapshot() else {
        if app.playback != PlaybackState::Stopped {
            app.stopped();
        }
        return;
    };

    app.playback = if snapshot.playing {
        PlaybackState::Playing
    } else {
        PlaybackState::Paused
    };
    let finished = state
        .completion
        .observe(snapshot.position, snapshot.duration);
    app.snapshot = Some(snapshot);

    if finished {
        debug!(now_playing = ?app.now_playing, "track finished");
        if !settings.playback.auto_advance {
            return;
        }
        match app.next_after_now_playing() {
            Some(next) => play_index(app, engine, state, next),
            None => info!("end of list"),
        }
    }
}

/// Load `tracks[idx]` and apply the current volume. Failures land in the
/// status box and leave nothing playing.
pub fn play_index(app: &mut App, engine: &PlaybackEngine, state: &mut EventLoopState, idx: usize) {
    let Some(path) = app.tracks.get(idx).map(|t| t.path.clone()) else {
        return;
    };

    state.completion.reset();
    match engine.play(&path) {
        Ok(()) => {
            engine.set_volume(app.volume());
            app.status = None;
            app.started(idx);
            app.snapshot = engine.snapshot();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot play track");
            app.status = Some(format!("cannot play {}: {e}", path.display()));
            app.stopped();
        }
    }
}

fn toggle_pause(app: &mut App, engine: &PlaybackEngine, state: &mut EventLoopState) {
    if app.playback == PlaybackState::Stopped {
        if app.has_tracks() {
            app.follow_playback_on();
            play_index(app, engine, state, app.selected);
        }
        return;
    }
    engine.pause();
    app.playback = if engine.is_playing() {
        PlaybackState::Playing
    } else {
        PlaybackState::Paused
    };
}

/// Seek relative to the current position, clamped to the track.
fn seek_by(app: &mut App, engine: &PlaybackEngine, delta: f64) {
    let (Ok(position), Ok(duration)) = (engine.position(), engine.duration()) else {
        return;
    };
    let target = (position + delta).clamp(0.0, duration);
    if let Err(e) = engine.seek(target) {
        warn!(target, error = %e, "seek failed");
        app.status = Some(format!("seek failed: {e}"));
    }
}

fn apply_volume(app: &App, engine: &PlaybackEngine) {
    engine.set_volume(app.volume());
}

/// Handle one key press. Returns `true` when the user asked to quit.
pub fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    engine: &PlaybackEngine,
    state: &mut EventLoopState,
) -> bool {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            engine.stop();
            return true;
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            let is_playing_selected =
                app.playback == PlaybackState::Playing && app.now_playing == Some(app.selected);
            if app.has_tracks() && !is_playing_selected {
                app.follow_playback_on();
                play_index(app, engine, state, app.selected);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => toggle_pause(app, engine, state),
        KeyCode::Char('L') => seek_by(app, engine, settings.controls.scrub_seconds as f64),
        KeyCode::Char('H') => seek_by(app, engine, -(settings.controls.scrub_seconds as f64)),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.step_volume(settings.controls.volume_step);
            apply_volume(app, engine);
        }
        KeyCode::Char('-') => {
            app.step_volume(-settings.controls.volume_step);
            apply_volume(app, engine);
        }
        KeyCode::Char('m') => {
            app.toggle_mute();
            apply_volume(app, engine);
        }
        KeyCode::Char('s') => {
            engine.stop();
            state.completion.reset();
            app.stopped();
        }
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}
