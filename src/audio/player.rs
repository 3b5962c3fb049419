use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::error::{PlayError, SeekError, StreamError};
use crate::metadata::{self, Metadata};

use super::decoder::{self, Codec};
use super::device::{OutputDevice, RenderBackend, RodioBackend};
use super::stages::compose;
use super::stream::{StreamCounter, TrackStream};
use super::types::{PlaybackSnapshot, StreamFormat, Transport, lock};

/// What the engine remembers about the loaded track. The stream itself
/// lives in the output device for as long as the session does.
struct TrackSession {
    path: PathBuf,
    metadata: Metadata,
    format: StreamFormat,
    transport: Arc<Transport>,
}

/// Plays one file at a time on an [`OutputDevice`].
///
/// Every method takes `&self`; the engine can be shared between the UI
/// thread and anything else that drives it.
pub struct PlaybackEngine {
    device: OutputDevice,
    session: Mutex<Option<TrackSession>>,
    streams: StreamCounter,
}

impl PlaybackEngine {
    pub fn new(backend: impl RenderBackend + 'static) -> Self {
        Self {
            device: OutputDevice::new(backend),
            session: Mutex::new(None),
            streams: StreamCounter::default(),
        }
    }

    /// Engine rendering to the system's default output. The device is
    /// opened when the first track starts.
    pub fn with_default_output() -> Self {
        Self::new(RodioBackend::new())
    }

    /// Replace whatever is loaded with `path` and start playing it.
    ///
    /// The previous track is torn down before anything else is opened. On
    /// error the engine is left idle.
    pub fn play(&self, path: impl AsRef<Path>) -> Result<(), PlayError> {
        let path = path.as_ref();
        let mut session = lock(&self.session);

        let opened = File::open(path);
        if session.take().is_some() {
            debug!("replacing loaded track");
        }
        self.device.detach();

        let codec = Codec::from_path(path)?;
        let mut file = opened.map_err(|source| PlayError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let probe = metadata::read(&mut file, path);
        file.seek(SeekFrom::Start(0)).map_err(|source| PlayError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let stream = decoder::open_stream(file, path, codec, probe.duration, &self.streams)?;
        let format = stream.format();
        let frames = stream.len();

        let transport = Arc::new(Transport::default());
        self.device.attach(compose(stream, transport.clone()))?;

        info!(
            path = %path.display(),
            title = probe.metadata.title(),
            seconds = format.frames_to_seconds(frames),
            "playing"
        );
        *session = Some(TrackSession {
            path: path.to_path_buf(),
            metadata: probe.metadata,
            format,
            transport,
        });
        Ok(())
    }

    /// [`play`](Self::play), then seek to `seconds`.
    ///
    /// A bad offset is reported as [`PlayError::StartOffset`]; the track
    /// stays loaded and plays from the start.
    pub fn play_from(&self, path: impl AsRef<Path>, seconds: f64) -> Result<(), PlayError> {
        self.play(path)?;
        if seconds == 0.0 {
            return Ok(());
        }
        self.seek(seconds).map_err(PlayError::StartOffset)
    }

    /// Unload the current track. Returns whether one was loaded.
    pub fn stop(&self) -> bool {
        let mut session = lock(&self.session);
        let had = session.take().is_some();
        self.device.detach();
        if had {
            info!("stopped");
        }
        had
    }

    /// Toggle between playing and paused. Does nothing when idle.
    pub fn pause(&self) {
        if let Some(session) = lock(&self.session).as_ref() {
            let paused = session.transport.toggle_pause();
            debug!(paused, "pause toggled");
        }
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.session)
            .as_ref()
            .is_some_and(|s| !s.transport.is_paused())
    }

    /// Gains above `-5` unmute; anything lower mutes. Does nothing when idle.
    pub fn set_volume(&self, gain: f64) {
        if let Some(session) = lock(&self.session).as_ref() {
            session.transport.set_volume(gain);
            debug!(gain, muted = session.transport.is_muted(), "volume set");
        }
    }

    /// Current gain, or `None` when idle. Muting keeps the previous gain.
    pub fn volume(&self) -> Option<f64> {
        lock(&self.session).as_ref().map(|s| s.transport.gain())
    }

    pub fn is_muted(&self) -> bool {
        lock(&self.session)
            .as_ref()
            .is_some_and(|s| s.transport.is_muted())
    }

    /// Jump to `seconds` from the start. Anything in `0..=duration` is accepted.
    pub fn seek(&self, seconds: f64) -> Result<(), SeekError> {
        let session = lock(&self.session);
        let session = session.as_ref().ok_or(SeekError::NoActiveStream)?;

        let mut device = self.device.lock();
        let stream = device.stream_mut().ok_or(SeekError::NoActiveStream)?;
        let len = stream.len();
        let out_of_bounds = || SeekError::OutOfBounds {
            seconds,
            duration: session.format.frames_to_seconds(len),
        };

        let frame = session
            .format
            .seconds_to_frame(seconds)
            .ok_or_else(out_of_bounds)?;
        let frame = u64::try_from(frame).map_err(|_| out_of_bounds())?;
        if frame > len {
            return Err(out_of_bounds());
        }

        stream.seek(frame).map_err(SeekError::Decoder)?;
        debug!(seconds, frame, "seeked");
        Ok(())
    }

    /// Seconds played so far.
    pub fn position(&self) -> Result<f64, StreamError> {
        self.read_stream(|stream, format| format.frames_to_seconds(stream.frame_position()))
    }

    /// Length of the loaded track in seconds.
    pub fn duration(&self) -> Result<f64, StreamError> {
        self.read_stream(|stream, format| format.frames_to_seconds(stream.len()))
    }

    /// Path of the loaded track, or an empty string when idle.
    pub fn file_path(&self) -> String {
        lock(&self.session)
            .as_ref()
            .map(|s| s.path.display().to_string())
            .unwrap_or_default()
    }

    /// Tags of the loaded track, or an empty set when idle.
    pub fn metadata(&self) -> Metadata {
        lock(&self.session)
            .as_ref()
            .map(|s| s.metadata.clone())
            .unwrap_or_default()
    }

    /// Everything the UI needs in one read, or `None` when idle.
    pub fn snapshot(&self) -> Option<PlaybackSnapshot> {
        let session = lock(&self.session);
        let session = session.as_ref()?;
        let device = self.device.lock();
        let stream = device.stream()?;
        Some(PlaybackSnapshot {
            file_path: session.path.display().to_string(),
            metadata: session.metadata.clone(),
            position: session.format.frames_to_seconds(stream.frame_position()),
            duration: session.format.frames_to_seconds(stream.len()),
            playing: !session.transport.is_paused(),
            gain: session.transport.gain(),
            muted: session.transport.is_muted(),
        })
    }

    /// Decoder streams currently open. Never more than one.
    pub fn live_streams(&self) -> usize {
        self.streams.live()
    }

    fn read_stream<T>(
        &self,
        read: impl FnOnce(&TrackStream, StreamFormat) -> T,
    ) -> Result<T, StreamError> {
        let session = lock(&self.session);
        let session = session.as_ref().ok_or(StreamError::NoActiveStream)?;
        let device = self.device.lock();
        let stream = device.stream().ok_or(StreamError::NoActiveStream)?;
        Ok(read(stream, session.format))
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.device.detach();
    }
}
