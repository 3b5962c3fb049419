//! Maps a file extension to a codec and opens a seekable sample stream.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, Source};
use tracing::{debug, warn};

use crate::error::PlayError;

use super::stream::{StreamCounter, TrackStream};
use super::types::StreamFormat;

/// The four codecs the player understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Codec {
    Mp3,
    Flac,
    Wav,
    Ogg,
}

impl Codec {
    pub const ALL: [Codec; 4] = [Codec::Mp3, Codec::Flac, Codec::Wav, Codec::Ogg];

    /// Case-insensitive, without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Codec::Mp3),
            "flac" => Some(Codec::Flac),
            "wav" => Some(Codec::Wav),
            "ogg" => Some(Codec::Ogg),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, PlayError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or(PlayError::UnsupportedFormat { extension: ext })
    }

    pub fn extension(self) -> &'static str {
        match self {
            Codec::Mp3 => "mp3",
            Codec::Flac => "flac",
            Codec::Wav => "wav",
            Codec::Ogg => "ogg",
        }
    }

    fn mime_type(self) -> &'static str {
        match self {
            Codec::Mp3 => "audio/mpeg",
            Codec::Flac => "audio/flac",
            Codec::Wav => "audio/wav",
            Codec::Ogg => "audio/ogg",
        }
    }
}

/// Decode `file` as `codec`.
///
/// `length_hint` is used when the decoder cannot report its own duration.
pub fn open_stream(
    file: File,
    path: &Path,
    codec: Codec,
    length_hint: Option<Duration>,
    counter: &StreamCounter,
) -> Result<TrackStream, PlayError> {
    let byte_len = file.metadata().map(|m| m.len()).ok();

    let mut builder = Decoder::builder()
        .with_data(BufReader::new(file))
        .with_hint(codec.extension())
        .with_mime_type(codec.mime_type())
        .with_seekable(true);
    if let Some(len) = byte_len {
        builder = builder.with_byte_len(len);
    }

    let decoder = builder.build().map_err(|source| PlayError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let format = StreamFormat {
        sample_rate: decoder.sample_rate(),
        channels: decoder.channels(),
    };

    let total = decoder.total_duration().or(length_hint);
    let len = match total {
        Some(d) => (d.as_secs_f64() * format.sample_rate as f64).round() as u64,
        None => {
            warn!(path = %path.display(), "stream length unknown");
            0
        }
    };

    debug!(
        path = %path.display(),
        ?codec,
        sample_rate = format.sample_rate,
        channels = format.channels,
        frames = len,
        "opened stream"
    );

    Ok(TrackStream::new(decoder, format, len, counter.acquire()))
}
