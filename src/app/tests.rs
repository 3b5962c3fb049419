use super::*;
use std::path::{Path, PathBuf};
use turntable::audio::SILENCE_THRESHOLD;
use turntable::library::Track;

fn t(title: &str) -> Track {
    Track {
        song_id: None,
        path: PathBuf::from(format!("/music/{title}.mp3")),
        title: title.into(),
        artist: None,
        album: None,
        genre: None,
        year: None,
    }
}

fn app(titles: &[&str]) -> App {
    App::new(titles.iter().map(|s| t(s)).collect(), "Library")
}

#[test]
fn next_and_prev_wrap_around() {
    let mut app = app(&["Alpha", "Beta", "Gamma"]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.next();
    assert_eq!(app.selected, 1);
}

#[test]
fn movement_on_empty_list_is_a_no_op() {
    let mut app = app(&[]);
    app.next();
    app.prev();
    app.select_last();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
}

#[test]
fn first_last_and_clamped_selection() {
    let mut app = app(&["Alpha", "Beta", "Gamma"]);
    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
    app.set_selected(10);
    assert_eq!(app.selected, 2);
}

#[test]
fn next_after_now_playing_stops_at_the_end() {
    let mut app = app(&["Alpha", "Beta"]);
    assert_eq!(app.next_after_now_playing(), None);
    app.started(0);
    assert_eq!(app.next_after_now_playing(), Some(1));
    app.started(1);
    assert_eq!(app.next_after_now_playing(), None);
}

#[test]
fn started_moves_cursor_only_when_following() {
    let mut app = app(&["Alpha", "Beta", "Gamma"]);
    app.started(2);
    assert_eq!(app.selected, 2);
    assert_eq!(app.playback, PlaybackState::Playing);

    app.follow_playback_off();
    app.select_first();
    app.started(1);
    assert_eq!(app.selected, 0);
    assert_eq!(app.now_playing_track().map(|t| t.title.as_str()), Some("Beta"));

    app.stopped();
    assert_eq!(app.now_playing, None);
    assert_eq!(app.playback, PlaybackState::Stopped);
}

#[test]
fn position_of_finds_track_by_path() {
    let app = app(&["Alpha", "Beta"]);
    assert_eq!(app.position_of(Path::new("/music/Beta.mp3")), Some(1));
    assert_eq!(app.position_of(Path::new("/music/Zeta.mp3")), None);
}

#[test]
fn volume_steps_are_clamped() {
    let mut app = app(&[]);
    assert_eq!(app.step_volume(0.5), 0.5);
    assert_eq!(app.step_volume(5.0), MAX_GAIN);
    assert_eq!(app.set_volume(-20.0), SILENCE_THRESHOLD);
    assert!(app.is_muted());
}

#[test]
fn mute_remembers_previous_gain() {
    let mut app = app(&[]);
    app.set_volume(-1.5);

    assert_eq!(app.toggle_mute(), SILENCE_THRESHOLD);
    assert!(app.is_muted());

    assert_eq!(app.toggle_mute(), -1.5);
    assert!(!app.is_muted());
}

#[test]
fn unmuting_after_sliding_to_silence_restores_last_mute_point() {
    let mut app = app(&[]);
    app.set_volume(0.5);
    app.toggle_mute();
    app.toggle_mute();
    // Sliding all the way down counts as muted; `m` brings back 0.5.
    app.set_volume(SILENCE_THRESHOLD);
    assert!(app.is_muted());
    assert_eq!(app.toggle_mute(), 0.5);
}
