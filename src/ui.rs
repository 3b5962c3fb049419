//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use turntable::config::{ControlsSettings, TimeField, UiSettings};
use turntable::library::display_from_fields;

use crate::app::{App, PlaybackState};

const CONTROLS: [(&str, &str); 10] = [
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected song"),
    ("space/p", "play/pause"),
    ("H/L", "scrub"),
    ("-/+", "volume"),
    ("m", "mute"),
    ("s", "stop"),
    ("K", "metadata"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds and volume step.
fn controls_text(controls: &ControlsSettings) -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| match *k {
            "H/L" => format!("[H/L] scrub -/+{}s", controls.scrub_seconds),
            "-/+" => format!("[-/+] volume -/+{}", controls.volume_step),
            _ => format!("[{k}] {v}"),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format seconds as `M:SS`, rounded to the nearest second.
fn format_mmss(seconds: f64) -> String {
    let secs = if seconds.is_finite() {
        seconds.max(0.0).round() as u64
    } else {
        0
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(position: f64, duration: f64, ui: &UiSettings) -> Option<String> {
    let parts: Vec<String> = ui
        .time_fields
        .iter()
        .map(|f| match f {
            TimeField::Elapsed => format_mmss(position),
            TimeField::Total => format_mmss(duration),
            TimeField::Remaining => format!("-{}", format_mmss(duration - position)),
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join(&ui.time_separator))
}

fn status_text(app: &App, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    if app.follow_playback {
        parts.push(" CURSOR: Follow".to_string());
    } else {
        parts.push(" CURSOR: Free-roam".to_string());
    }
    parts.push(app.source.clone());

    match (app.now_playing_track(), app.playback) {
        (Some(track), PlaybackState::Playing | PlaybackState::Paused) => {
            let song = display_from_fields(track, &ui.now_playing_fields, &ui.now_playing_separator);
            let time = app
                .snapshot
                .as_ref()
                .and_then(|s| now_playing_time_text(s.position, s.duration, ui));
            match time {
                Some(time) => parts.push(format!("Song: {song} [{time}]")),
                None => parts.push(format!("Song: {song}")),
            }
            let state = if app.playback == PlaybackState::Playing {
                "Playing"
            } else {
                "Paused"
            };
            parts.push(state.to_string());
        }
        _ => parts.push("Stopped".to_string()),
    }

    if app.is_muted() {
        parts.push("Volume: muted".to_string());
    } else {
        parts.push(format!("Volume: {:+.1}", app.volume()));
    }

    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

fn metadata_text(app: &App) -> String {
    let Some(track) = app.selected_track() else {
        return "No track selected".to_string();
    };

    let duration = app
        .snapshot
        .as_ref()
        .filter(|_| app.now_playing == Some(app.selected))
        .map(|s| format_mmss(s.duration))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nGenre: {}\nYear: {}\nDuration: {}\nPath: {}",
        track.title,
        track.artist.as_deref().unwrap_or("-"),
        track.album.as_deref().unwrap_or("-"),
        track.genre.as_deref().unwrap_or("-"),
        track.year.as_deref().unwrap_or("-"),
        duration,
        track.path.display()
    )
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings, controls: &ControlsSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" turntable ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, ui_settings))
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Only build ListItems for the visible window, centered on the selection.
    {
        let total = app.tracks.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let text =
                    display_from_fields(track, &ui_settings.list_fields, &ui_settings.list_separator);
                if app.now_playing == Some(start + offset) {
                    ListItem::new(format!("♪ {text}")).style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    ListItem::new(text)
                }
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(sel_pos - start));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Overlay metadata popup (keeps list visible under it)
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 11, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let meta = Paragraph::new(metadata_text(app))
            .block(left_padded(" metadata (K closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(meta, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests;
