use super::*;
use ratatui::{Terminal, backend::TestBackend};
use std::path::PathBuf;
use turntable::config::Settings;
use turntable::library::Track;

fn track(title: &str, artist: &str) -> Track {
    Track {
        song_id: None,
        path: PathBuf::from(format!("/music/{title}.flac")),
        title: title.into(),
        artist: Some(artist.into()),
        album: None,
        genre: None,
        year: None,
    }
}

fn screen(app: &App) -> String {
    let settings = Settings::default();
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| draw(f, app, &settings.ui, &settings.controls))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn format_mmss_rounds_to_nearest_second() {
    assert_eq!(format_mmss(0.0), "0:00");
    assert_eq!(format_mmss(59.6), "1:00");
    assert_eq!(format_mmss(125.2), "2:05");
    assert_eq!(format_mmss(-3.0), "0:00");
    assert_eq!(format_mmss(f64::NAN), "0:00");
}

#[test]
fn time_text_follows_configured_fields() {
    let mut ui = UiSettings::default();
    assert_eq!(
        now_playing_time_text(30.0, 90.0, &ui).as_deref(),
        Some("0:30 / 1:30 / -1:00")
    );

    ui.time_fields = vec![TimeField::Remaining];
    assert_eq!(now_playing_time_text(30.0, 90.0, &ui).as_deref(), Some("-1:00"));

    ui.time_fields.clear();
    assert_eq!(now_playing_time_text(30.0, 90.0, &ui), None);
}

#[test]
fn controls_text_includes_configured_steps() {
    let text = controls_text(&ControlsSettings {
        scrub_seconds: 10,
        volume_step: 0.25,
    });
    assert!(text.contains("[H/L] scrub -/+10s"));
    assert!(text.contains("[-/+] volume -/+0.25"));
    assert!(text.contains("[q] quit"));
}

#[test]
fn status_shows_stopped_and_volume() {
    let mut app = App::new(vec![track("Song", "Band")], "Library");
    let ui = UiSettings::default();
    let text = status_text(&app, &ui);
    assert!(text.contains("Library"));
    assert!(text.contains("Stopped"));
    assert!(text.contains("Volume: +0.0"));

    app.toggle_mute();
    app.status = Some("cannot play x".into());
    let text = status_text(&app, &ui);
    assert!(text.contains("Volume: muted"));
    assert!(text.contains("cannot play x"));
}

#[test]
fn draw_lists_tracks_and_marks_now_playing() {
    let mut app = App::new(vec![track("One", "A"), track("Two", "B")], "Library");
    app.started(1);

    let screen = screen(&app);

    assert!(screen.contains("turntable"));
    assert!(screen.contains("A - One"));
    assert!(screen.contains("♪ B - Two"));
    assert!(screen.contains("Song: B - Two"));
}

#[test]
fn metadata_popup_shows_selected_track() {
    let mut app = App::new(vec![track("One", "A")], "Library");
    app.toggle_metadata_window();

    let screen = screen(&app);

    assert!(screen.contains("metadata (K closes)"));
    assert!(screen.contains("Artist: A"));
}

#[test]
fn draw_handles_empty_library() {
    let app = App::new(Vec::new(), "Library");
    assert!(screen(&app).contains("Stopped"));
}
