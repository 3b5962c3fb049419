//! Application model types: `App` and `PlaybackState`.
//!
//! The `App` struct holds the listed tracks, the cursor, what is playing and
//! the volume the user picked. It never talks to the engine itself; the
//! runtime applies what `App` decides.

use std::path::Path;

use turntable::audio::{PlaybackSnapshot, SILENCE_THRESHOLD};
use turntable::library::Track;

/// Loudest gain the volume keys reach.
pub const MAX_GAIN: f64 = 1.0;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,
    pub playback: PlaybackState,
    /// Index into `tracks` of the loaded track.
    pub now_playing: Option<usize>,
    /// Last engine read, refreshed on every poll.
    pub snapshot: Option<PlaybackSnapshot>,

    pub follow_playback: bool,
    pub metadata_window: bool,
    /// What the list shows, e.g. `Library` or `Playlist: Road trip`.
    pub source: String,
    /// One-line message shown in the status box until the next action.
    pub status: Option<String>,

    volume: f64,
    prev_volume: f64,
}

impl App {
    /// Create a new `App` listing `tracks`.
    pub fn new(tracks: Vec<Track>, source: impl Into<String>) -> Self {
        Self {
            tracks,
            selected: 0,
            playback: PlaybackState::Stopped,
            now_playing: None,
            snapshot: None,
            follow_playback: true,
            metadata_window: false,
            source: source.into(),
            status: None,
            volume: 0.0,
            prev_volume: 0.0,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    pub fn now_playing_track(&self) -> Option<&Track> {
        self.now_playing.and_then(|i| self.tracks.get(i))
    }

    /// Index of the first track whose path is `path`.
    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.tracks.iter().position(|t| t.path == path)
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Set the selected track index, clamped to the list.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.tracks.len().saturating_sub(1));
    }

    /// Move selection to the next track, wrapping to the top.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move selection to the previous track, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.tracks.len() - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    /// The track that follows the one playing. `None` at the end of the list.
    pub fn next_after_now_playing(&self) -> Option<usize> {
        let next = self.now_playing? + 1;
        (next < self.tracks.len()).then_some(next)
    }

    /// Record that `idx` started playing.
    pub fn started(&mut self, idx: usize) {
        self.now_playing = Some(idx);
        self.playback = PlaybackState::Playing;
        if self.follow_playback {
            self.selected = idx;
        }
    }

    /// Record that nothing is loaded anymore.
    pub fn stopped(&mut self) {
        self.now_playing = None;
        self.snapshot = None;
        self.playback = PlaybackState::Stopped;
    }

    /// Gain to hand the engine. At or below `SILENCE_THRESHOLD` means muted.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.volume <= SILENCE_THRESHOLD
    }

    /// Set the gain directly, e.g. from `playback.start_volume`.
    pub fn set_volume(&mut self, gain: f64) -> f64 {
        self.volume = gain.clamp(SILENCE_THRESHOLD, MAX_GAIN);
        self.volume
    }

    /// Raise or lower the gain by `delta`. Returns the new gain.
    pub fn step_volume(&mut self, delta: f64) -> f64 {
        self.set_volume(self.volume + delta)
    }

    /// Muting remembers the current gain; unmuting restores it.
    pub fn toggle_mute(&mut self) -> f64 {
        if self.is_muted() {
            self.volume = self.prev_volume;
        } else {
            self.prev_volume = self.volume;
            self.volume = SILENCE_THRESHOLD;
        }
        self.volume
    }
}
